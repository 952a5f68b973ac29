//! # Parser 模块
//!
//! 手写递归下降解析器，把文本解析为顶层表达式序列（AST）。
//!
//! ## 语法
//!
//! ```text
//! program := expr+
//! expr    := dict | define | ref | NUMBER
//! dict    := "{" (pair ("," pair)* ","?)? "}"
//! pair    := NAME "=" expr
//! define  := "(" "define" NAME expr ")"
//! ref     := "." "[" NAME "]" "."
//!
//! NUMBER  := [+-]? DIGIT+ "."? DIGIT* [eE] [+-]? DIGIT+
//! NAME    := [a-z]+
//! ```
//!
//! 空白在任意 token 之间都可忽略。
//! 一个前瞻字符即可在四种 `expr` 之间做出选择，不需要回溯。
//!
//! 注意：数字字面量**必须**带指数部分（`5` 不是合法数字，`5e+0` 才是）。
//!
//! 字典与定义的嵌套深度不超过 [`MAX_NESTING_DEPTH`]，超出时返回
//! [`SyntaxError::TooDeep`]，求值与渲染的递归深度因此也有上界。

mod cursor;


use crate::ast::{Expr, Program};
use crate::error::SyntaxError;

use cursor::Cursor;

/// 字典与定义的最大嵌套深度
pub const MAX_NESTING_DEPTH: usize = 128;

const EXPR_START: &str = "an expression ('{', '(', '.[' or a number)";

/// 解析程序文本
///
/// 成功时返回至少包含一个表达式的序列。
pub fn parse_program(text: &str) -> Result<Program, SyntaxError> {
    ProgramParser::new(text).parse_program()
}

/// 解析单个表达式，要求整段文本恰好是一个表达式
pub fn parse_expr(text: &str) -> Result<Expr, SyntaxError> {
    let mut parser = ProgramParser::new(text);
    let expr = parser.parse_expr()?;
    parser.cursor.skip_whitespace();
    if !parser.cursor.is_at_end() {
        return Err(parser.trailing_input());
    }
    Ok(expr)
}

struct ProgramParser<'a> {
    cursor: Cursor<'a>,
    /// 当前所在的字典/定义层数
    depth: usize,
}

impl<'a> ProgramParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            cursor: Cursor::new(text),
            depth: 0,
        }
    }

    fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        self.cursor.skip_whitespace();
        if self.cursor.is_at_end() {
            return Err(self.unexpected_end(EXPR_START));
        }

        let mut program = vec![self.parse_expr()?];
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek_char() {
                None => break,
                Some(c) if starts_expr(c) => program.push(self.parse_expr()?),
                Some(_) => return Err(self.trailing_input()),
            }
        }

        Ok(program)
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.cursor.skip_whitespace();
        match self.cursor.peek_char() {
            None => Err(self.unexpected_end(EXPR_START)),
            Some('{') => self.nested(Self::parse_dict),
            Some('(') => self.nested(Self::parse_define),
            Some('.') => self.parse_ref(),
            Some(c) if c == '+' || c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(self.unexpected_char(c, EXPR_START)),
        }
    }

    /// 进入一层嵌套结构
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Expr, SyntaxError>,
    ) -> Result<Expr, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// `{ key = expr, ... }`，允许尾随逗号
    fn parse_dict(&mut self) -> Result<Expr, SyntaxError> {
        self.expect('{')?;
        let mut items = Vec::new();

        self.cursor.skip_whitespace();
        if self.cursor.eat_if(|c| c == '}') {
            return Ok(Expr::Dict(items));
        }

        loop {
            let key = self.parse_name()?;
            self.expect('=')?;
            let value = self.parse_expr()?;
            items.push((key, value));

            self.cursor.skip_whitespace();
            match self.cursor.peek_char() {
                Some(',') => {
                    self.cursor.consume_char();
                    self.cursor.skip_whitespace();
                    if self.cursor.eat_if(|c| c == '}') {
                        break;
                    }
                }
                Some('}') => {
                    self.cursor.consume_char();
                    break;
                }
                Some(c) => return Err(self.unexpected_char(c, "',' or '}'")),
                None => return Err(self.unexpected_end("',' or '}'")),
            }
        }

        Ok(Expr::Dict(items))
    }

    /// `(define name expr)`
    fn parse_define(&mut self) -> Result<Expr, SyntaxError> {
        self.expect('(')?;
        self.cursor.skip_whitespace();
        if !self.cursor.eat_str("define") {
            return Err(match self.cursor.peek_char() {
                Some(c) => self.unexpected_char(c, "'define'"),
                None => self.unexpected_end("'define'"),
            });
        }

        let name = self.parse_name()?;
        let value = self.parse_expr()?;
        self.expect(')')?;
        Ok(Expr::define(name, value))
    }

    /// `.[name].`
    fn parse_ref(&mut self) -> Result<Expr, SyntaxError> {
        self.expect('.')?;
        self.expect('[')?;
        let name = self.parse_name()?;
        self.expect(']')?;
        self.expect('.')?;
        Ok(Expr::Ref(name))
    }

    fn parse_number(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.cursor.offset();

        self.cursor.eat_if(|c| c == '+' || c == '-');
        if self.cursor.eat_while(|c| c.is_ascii_digit()) == 0 {
            return Err(self.malformed_number("expected a digit"));
        }
        if self.cursor.eat_if(|c| c == '.') {
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        if !self.cursor.eat_if(|c| c == 'e' || c == 'E') {
            return Err(self.malformed_number("missing exponent marker 'e' or 'E'"));
        }
        self.cursor.eat_if(|c| c == '+' || c == '-');
        if self.cursor.eat_while(|c| c.is_ascii_digit()) == 0 {
            return Err(self.malformed_number("missing exponent digits"));
        }

        Ok(Expr::number(self.cursor.slice_from(start)))
    }

    /// 名称：一个或多个小写 ASCII 字母
    fn parse_name(&mut self) -> Result<String, SyntaxError> {
        self.cursor.skip_whitespace();
        let start = self.cursor.offset();
        if self.cursor.eat_while(|c| c.is_ascii_lowercase()) == 0 {
            const EXPECTED: &str = "a name (lowercase letters)";
            return Err(match self.cursor.peek_char() {
                Some(c) => self.unexpected_char(c, EXPECTED),
                None => self.unexpected_end(EXPECTED),
            });
        }
        Ok(self.cursor.slice_from(start).to_string())
    }

    /// 跳过空白后消费指定字符
    fn expect(&mut self, expected: char) -> Result<(), SyntaxError> {
        self.cursor.skip_whitespace();
        match self.cursor.peek_char() {
            Some(c) if c == expected => {
                self.cursor.consume_char();
                Ok(())
            }
            Some(c) => Err(self.unexpected_char(c, &format!("'{expected}'"))),
            None => Err(self.unexpected_end(&format!("'{expected}'"))),
        }
    }

    // -------------------------------------------------------------------------
    // 错误构造
    // -------------------------------------------------------------------------

    fn unexpected_char(&self, found: char, expected: &str) -> SyntaxError {
        let (line, column) = self.cursor.position();
        SyntaxError::UnexpectedChar {
            line,
            column,
            found,
            expected: expected.to_string(),
        }
    }

    fn unexpected_end(&self, expected: &str) -> SyntaxError {
        let (line, column) = self.cursor.position();
        SyntaxError::UnexpectedEnd {
            line,
            column,
            expected: expected.to_string(),
        }
    }

    fn malformed_number(&self, message: &str) -> SyntaxError {
        let (line, column) = self.cursor.position();
        SyntaxError::MalformedNumber {
            line,
            column,
            message: message.to_string(),
        }
    }

    fn too_deep(&self) -> SyntaxError {
        let (line, column) = self.cursor.position();
        SyntaxError::TooDeep {
            line,
            column,
            limit: MAX_NESTING_DEPTH,
        }
    }

    fn trailing_input(&self) -> SyntaxError {
        let (line, column) = self.cursor.position();
        let found = self
            .cursor
            .remaining()
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(20)
            .collect();
        SyntaxError::TrailingInput {
            line,
            column,
            found,
        }
    }
}

fn starts_expr(c: char) -> bool {
    matches!(c, '{' | '(' | '.' | '+' | '-') || c.is_ascii_digit()
}
