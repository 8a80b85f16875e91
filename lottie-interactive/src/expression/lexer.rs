use crate::ExpressionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Number,
    Identifier,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    Question,
    Colon,
    Comma,
    LeftParen,
    RightParen,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    EqualEqual,
    AndAnd,
    OrOr,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Character offset of the token within the formula.
    pub position: usize,
}

impl Token<'_> {
    /// Human readable name used in syntax errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Number => format!("number {}", self.text),
            TokenKind::Identifier => format!("identifier {}", self.text),
            TokenKind::End => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

const TWO_CHAR_OPERATORS: [(&str, TokenKind); 5] = [
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("==", TokenKind::EqualEqual),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
];

fn operator_at(rest: &str) -> Option<(TokenKind, usize)> {
    for (text, kind) in TWO_CHAR_OPERATORS {
        if rest.starts_with(text) {
            return Some((kind, text.len()));
        }
    }

    let kind = match rest.chars().next()? {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '^' => TokenKind::Caret,
        '!' => TokenKind::Bang,
        '?' => TokenKind::Question,
        ':' => TokenKind::Colon,
        ',' => TokenKind::Comma,
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '<' => TokenKind::Less,
        '>' => TokenKind::Greater,
        _ => return None,
    };
    Some((kind, 1))
}

// `0`, or digits without a leading zero, optionally followed by `.` and more digits.
fn is_number(word: &str) -> bool {
    let (int, frac) = match word.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (word, None),
    };
    let int_ok = int == "0"
        || (int.starts_with(|c: char| c.is_ascii_digit() && c != '0')
            && int.bytes().all(|b| b.is_ascii_digit()));
    int_ok && frac.is_none_or(|f| f.bytes().all(|b| b.is_ascii_digit()))
}

fn is_identifier_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_identifier(word: &str) -> bool {
    word.split('.').all(is_identifier_segment)
}

/// Splits a formula into tokens, always terminated by a [`TokenKind::End`] sentinel.
///
/// Any run of characters that is neither whitespace nor an operator forms a single word, which
/// must then be a number or an identifier.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut offset = 0usize;
    let mut position = 0usize;

    while offset < input.len() {
        let rest = &input[offset..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c.is_whitespace() {
            offset += c.len_utf8();
            position += 1;
            continue;
        }

        if let Some((kind, len)) = operator_at(rest) {
            tokens.push(Token {
                kind,
                text: &rest[..len],
                position,
            });
            offset += len;
            position += len;
            continue;
        }

        let len = rest
            .char_indices()
            .find(|&(i, ch)| ch.is_whitespace() || operator_at(&rest[i..]).is_some())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let word = &rest[..len];
        let kind = if is_number(word) {
            TokenKind::Number
        } else if is_identifier(word) {
            TokenKind::Identifier
        } else {
            return Err(ExpressionError::InvalidToken {
                token: word.to_string(),
                position,
            });
        };

        tokens.push(Token {
            kind,
            text: word,
            position,
        });
        offset += len;
        position += word.chars().count();
    }

    tokens.push(Token {
        kind: TokenKind::End,
        text: "",
        position,
    });
    Ok(tokens)
}
