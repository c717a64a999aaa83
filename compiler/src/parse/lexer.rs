//! Splits a pipeline string into process names and lane delimiters.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Name(String),
    /// `(` opens a lane group.
    Open,
    /// `|` separates lanes inside a group.
    Bar,
    /// `)` closes a lane group.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the source string.
    pub pos: usize,
}

impl Token {
    /// The token as it appeared in the source.
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Name(name) => name,
            TokenKind::Open => "(",
            TokenKind::Bar => "|",
            TokenKind::Close => ")",
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | '|' | ')')
}

/// Tokenize a pipeline string. Never fails: anything that is neither
/// whitespace nor a delimiter is part of a name.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if is_delimiter(c) {
            chars.next();
            let kind = match c {
                '(' => TokenKind::Open,
                '|' => TokenKind::Bar,
                _ => TokenKind::Close,
            };
            tokens.push(Token { kind, pos });
            continue;
        }

        let mut end = pos;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || is_delimiter(c) {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        tokens.push(Token {
            kind: TokenKind::Name(input[pos..end].to_string()),
            pos,
        });
    }

    tokens
}
