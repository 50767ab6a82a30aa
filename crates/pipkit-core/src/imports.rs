//! Import-path extraction for Go source files.
//!
//! Only the package clause and the import declarations that follow it are
//! scanned; the first other top-level token ends the scan, so the function
//! bodies after the imports are never tokenized.

use crate::error::{PipError, Result};

/// Extracts the imported module paths from program text.
pub trait ImportParser {
    fn extract_imports(&self, source: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoImportScanner;

impl ImportParser for GoImportScanner {
    fn extract_imports(&self, source: &str) -> Result<Vec<String>> {
        scan_go_imports(source)
    }
}

/// Returns import paths in declaration order, duplicates included.
pub fn scan_go_imports(source: &str) -> Result<Vec<String>> {
    let mut scanner = Scanner::new(source);

    match scanner.next_token()? {
        Some(Token::Ident(word)) if word == "package" => {}
        _ => return Err(scanner.error("expected 'package' clause")),
    }
    match scanner.next_token()? {
        Some(Token::Ident(_)) => {}
        _ => return Err(scanner.error("expected package name after 'package'")),
    }

    let mut imports = Vec::new();
    loop {
        match scanner.next_token()? {
            Some(Token::Punct(';')) => continue,
            Some(Token::Ident(word)) if word == "import" => {
                scanner.import_decl(&mut imports)?;
            }
            _ => break,
        }
    }

    Ok(imports)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Punct(char),
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, reason: &str) -> PipError {
        PipError::ImportParse {
            line: self.line,
            reason: reason.to_string(),
        }
    }

    /// `import "path"`, `import alias "path"` or a parenthesized group.
    fn import_decl(&mut self, imports: &mut Vec<String>) -> Result<()> {
        match self.next_token()? {
            Some(Token::Punct('(')) => loop {
                match self.next_token()? {
                    Some(Token::Punct(')')) => return Ok(()),
                    Some(Token::Punct(';')) => continue,
                    Some(Token::Str(path)) => imports.push(path),
                    Some(Token::Ident(_)) | Some(Token::Punct('.')) => {
                        imports.push(self.expect_path()?);
                    }
                    Some(_) => return Err(self.error("unexpected token in import group")),
                    None => return Err(self.error("unterminated import group")),
                }
            },
            Some(Token::Str(path)) => {
                imports.push(path);
                Ok(())
            }
            Some(Token::Ident(_)) | Some(Token::Punct('.')) => {
                imports.push(self.expect_path()?);
                Ok(())
            }
            _ => Err(self.error("expected import path")),
        }
    }

    fn expect_path(&mut self) -> Result<String> {
        match self.next_token()? {
            Some(Token::Str(path)) => Ok(path),
            _ => Err(self.error("expected import path after import name")),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia()?;
        let Some(&ch) = self.chars.get(self.pos) else {
            return Ok(None);
        };

        if ch.is_alphabetic() || ch == '_' {
            let start = self.pos;
            while self
                .chars
                .get(self.pos)
                .is_some_and(|c| c.is_alphanumeric() || *c == '_')
            {
                self.pos += 1;
            }
            return Ok(Some(Token::Ident(
                self.chars[start..self.pos].iter().collect(),
            )));
        }

        if ch == '"' {
            return self.interpreted_string().map(Some);
        }
        if ch == '`' {
            return self.raw_string().map(Some);
        }

        self.pos += 1;
        Ok(Some(Token::Punct(ch)))
    }

    fn interpreted_string(&mut self) -> Result<Token> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.chars.get(self.pos) {
                Some('"') => {
                    self.pos += 1;
                    return Ok(Token::Str(value));
                }
                Some('\\') => {
                    if let Some(&escaped) = self.chars.get(self.pos + 1) {
                        value.push(escaped);
                        self.pos += 2;
                    } else {
                        return Err(self.error("unterminated string literal"));
                    }
                }
                Some('\n') | None => return Err(self.error("unterminated string literal")),
                Some(&c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn raw_string(&mut self) -> Result<Token> {
        self.pos += 1;
        let start = self.pos;
        while let Some(&c) = self.chars.get(self.pos) {
            if c == '`' {
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(Token::Str(value));
            }
            if c == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        Err(self.error("unterminated raw string literal"))
    }

    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(&c) = self.chars.get(self.pos) {
            if c == '\n' {
                self.line += 1;
                self.pos += 1;
            } else if c.is_whitespace() {
                self.pos += 1;
            } else if c == '/' && self.chars.get(self.pos + 1) == Some(&'/') {
                while self.chars.get(self.pos).is_some_and(|c| *c != '\n') {
                    self.pos += 1;
                }
            } else if c == '/' && self.chars.get(self.pos + 1) == Some(&'*') {
                self.pos += 2;
                loop {
                    match self.chars.get(self.pos) {
                        Some('*') if self.chars.get(self.pos + 1) == Some(&'/') => {
                            self.pos += 2;
                            break;
                        }
                        Some('\n') => {
                            self.line += 1;
                            self.pos += 1;
                        }
                        Some(_) => self.pos += 1,
                        None => return Err(self.error("unterminated block comment")),
                    }
                }
            } else {
                break;
            }
        }
        Ok(())
    }
}
