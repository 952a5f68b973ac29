//! 字符游标：在输入文本上前进，并把字节偏移换算为行列号。

pub(super) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn offset(&self) -> usize {
        self.pos
    }

    pub(super) fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(super) fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(super) fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub(super) fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// 若下一个字符满足条件则消费它
    pub(super) fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(c) if pred(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// 连续消费满足条件的字符，返回消费的个数
    pub(super) fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.eat_if(&pred) {
            count += 1;
        }
        count
    }

    /// 若剩余文本以 `keyword` 开头则消费它
    pub(super) fn eat_str(&mut self, keyword: &str) -> bool {
        if self.remaining().starts_with(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    /// 跳过空白（空格、制表、换行、回车、换页）
    pub(super) fn skip_whitespace(&mut self) {
        self.eat_while(|c| c.is_ascii_whitespace());
    }

    /// 当前位置的 `(line, column)`，均从 1 开始
    pub(super) fn position(&self) -> (usize, usize) {
        self.position_at(self.pos)
    }

    pub(super) fn position_at(&self, offset: usize) -> (usize, usize) {
        let before = &self.input[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}
