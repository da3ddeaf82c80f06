use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("let")]
    Let,
    #[terminal("{")]
    LBrace,
    #[terminal("}")]
    RBrace,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("[")]
    LBracket,
    #[terminal("]")]
    RBracket,
    #[terminal("=>")]
    FatArrow,
    #[terminal("=")]
    Equals,
    #[terminal("->")]
    Arrow,
    #[terminal("::")]
    DoubleColon,
    #[terminal(":")]
    Colon,
    #[literal("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[literal(r"(\+\+|==|!=|>=|<=|&&|\|\||[-+*/%<>])")]
    Operator,
    #[literal(r"\.[a-zA-Z0-9_]+")]
    Label,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[literal("-?[0-9]+")]
    Integer,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Let(inner) => inner.position.clone(),
            Token::LBrace(inner) => inner.position.clone(),
            Token::RBrace(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBracket(inner) => inner.position.clone(),
            Token::RBracket(inner) => inner.position.clone(),
            Token::FatArrow(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::Arrow(inner) => inner.position.clone(),
            Token::DoubleColon(inner) => inner.position.clone(),
            Token::Colon(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Operator(inner) => inner.position.clone(),
            Token::Label(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Let(_) => "'let'".to_string(),
            Token::LBrace(_) => "'{'".to_string(),
            Token::RBrace(_) => "'}'".to_string(),
            Token::LParen(_) => "'('".to_string(),
            Token::RParen(_) => "')'".to_string(),
            Token::LBracket(_) => "'['".to_string(),
            Token::RBracket(_) => "']'".to_string(),
            Token::FatArrow(_) => "'=>'".to_string(),
            Token::Equals(_) => "'='".to_string(),
            Token::Arrow(_) => "'->'".to_string(),
            Token::DoubleColon(_) => "'::'".to_string(),
            Token::Colon(_) => "':'".to_string(),
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Operator(inner) => format!("operator '{}'", inner.value),
            Token::Label(inner) => format!("label '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::Integer(inner) => format!("integer '{}'", inner.value),
        }
    }
}

/// Blank out `#` comments. Every other character keeps its offset, so token
/// positions still point into the source.
pub fn strip_comments(source: &str) -> String {
    let mut stripped = String::with_capacity(source.len());
    let mut in_string = false;
    let mut in_comment = false;
    let mut escaped = false;

    for c in source.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                stripped.push(c);
            } else {
                stripped.push(' ');
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            stripped.push(c);
            continue;
        }

        match c {
            '#' => {
                in_comment = true;
                stripped.push(' ');
            }
            '"' => {
                in_string = true;
                stripped.push(c);
            }
            _ => stripped.push(c),
        }
    }

    stripped
}

/// Resolve the escapes of a string literal token, dropping the quotes.
pub fn unescape(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(literal);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}
