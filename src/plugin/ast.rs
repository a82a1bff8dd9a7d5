//! Typed syntax model for the plugin-list source file.
//!
//! A scaffolded app declares its plugins in `src/plugins.js`:
//!
//! ```js
//! const outputs = [];
//! const auths = [];
//! const caches = [];
//! const plugins = [];
//! module.exports = [...outputs, ...auths, ...caches, ...plugins];
//! ```
//!
//! Registration rewrites that file: an import statement is prepended and a
//! descriptor object is appended to one of the lists. The model is closed
//! over the handful of node kinds this file can contain (import statements,
//! identifiers, string literals, object literals, and the list declarations
//! with their combining export). Anything else fails to parse, which the
//! registrar reports as a malformed source file.

/// The four list declarations, in the order the combinator spreads them.
pub const LIST_NAMES: [&str; 4] = ["outputs", "auths", "caches", "plugins"];

#[cfg(windows)]
const EOL: &str = "\r\n";
#[cfg(not(windows))]
const EOL: &str = "\n";

/// An expression inside a list declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare identifier reference.
    Ident(String),
    /// A string literal, serialized single-quoted.
    Str(String),
    /// An object literal with identifier keys.
    Object(Vec<(String, Expr)>),
}

/// One top-level statement of the plugin-list file.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `const <binding> = require('<module>');`, where `initializer` adds
    /// the trailing call local plugins use: `require('<module>')();`
    Import {
        binding: String,
        module: String,
        initializer: bool,
    },
    /// `const <name> = [<elements>];`
    ListDecl { name: String, elements: Vec<Expr> },
    /// `module.exports = [...<list>, ...];`
    ExportAll { lists: Vec<String> },
}

/// An in-memory plugin-list file, owned for the duration of one
/// registration: parse, mutate, serialize, discard.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub statements: Vec<Statement>,
}

impl SourceFile {
    /// The plugin list of a freshly scaffolded app: four empty lists and
    /// the combining export.
    pub fn initial() -> Self {
        let mut statements: Vec<Statement> = LIST_NAMES
            .iter()
            .map(|name| Statement::ListDecl {
                name: name.to_string(),
                elements: Vec::new(),
            })
            .collect();
        statements.push(Statement::ExportAll {
            lists: LIST_NAMES.iter().map(|name| name.to_string()).collect(),
        });
        SourceFile { statements }
    }

    /// Parse `source` into the typed model.
    ///
    /// The error is a human-readable detail string; the caller attaches the
    /// file path.
    pub fn parse(source: &str) -> Result<Self, String> {
        let tokens = lex(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let mut statements = Vec::new();
        let mut seen_lists: Vec<String> = Vec::new();
        while parser.peek().is_some() {
            let statement = parser.parse_statement()?;
            if let Statement::ListDecl { name, .. } = &statement {
                if seen_lists.iter().any(|seen| seen == name) {
                    return Err(format!("duplicate list declaration '{name}'"));
                }
                seen_lists.push(name.clone());
            }
            statements.push(statement);
        }
        Ok(SourceFile { statements })
    }

    /// Insert an import as the very first statement.
    pub fn prepend_import(&mut self, binding: &str, module: &str, initializer: bool) {
        self.statements.insert(
            0,
            Statement::Import {
                binding: binding.to_string(),
                module: module.to_string(),
                initializer,
            },
        );
    }

    /// The elements of the list declared as `name`, if such a declaration
    /// exists at the top level.
    pub fn list_mut(&mut self, name: &str) -> Option<&mut Vec<Expr>> {
        self.statements.iter_mut().find_map(|statement| match statement {
            Statement::ListDecl { name: declared, elements } if declared == name => Some(elements),
            _ => None,
        })
    }

    /// Serialize back to source text: 2-space indentation, single-quoted
    /// strings, one statement per line, any doubled blank line collapsed to
    /// a single platform line separator.
    pub fn serialize(&self) -> String {
        let rendered: Vec<String> = self.statements.iter().map(Statement::render).collect();
        collapse_blank_lines(&rendered.join("\n"))
    }
}

impl Statement {
    fn render(&self) -> String {
        match self {
            Statement::Import { binding, module, initializer } => {
                let call = if *initializer { "()" } else { "" };
                format!("const {binding} = require('{}'){call};", escape(module))
            }
            Statement::ListDecl { name, elements } => {
                if elements.is_empty() {
                    format!("const {name} = [];")
                } else if elements.iter().all(|e| matches!(e, Expr::Ident(_))) {
                    let items: Vec<String> = elements.iter().map(|e| e.render(0)).collect();
                    format!("const {name} = [{}];", items.join(", "))
                } else {
                    let mut out = format!("const {name} = [\n");
                    for (i, element) in elements.iter().enumerate() {
                        out.push_str("  ");
                        out.push_str(&element.render(1));
                        if i + 1 < elements.len() {
                            out.push(',');
                        }
                        out.push('\n');
                    }
                    out.push_str("];");
                    out
                }
            }
            Statement::ExportAll { lists } => {
                let spreads: Vec<String> = lists.iter().map(|list| format!("...{list}")).collect();
                format!("module.exports = [{}];", spreads.join(", "))
            }
        }
    }
}

impl Expr {
    fn render(&self, depth: usize) -> String {
        match self {
            Expr::Ident(name) => name.clone(),
            Expr::Str(value) => format!("'{}'", escape(value)),
            Expr::Object(properties) => {
                if properties.is_empty() {
                    return "{}".to_string();
                }
                let pad = "  ".repeat(depth + 1);
                let close = "  ".repeat(depth);
                let mut out = String::from("{\n");
                for (i, (key, value)) in properties.iter().enumerate() {
                    out.push_str(&pad);
                    out.push_str(key);
                    out.push_str(": ");
                    out.push_str(&value.render(depth + 1));
                    if i + 1 < properties.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&close);
                out.push('}');
                out
            }
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_newline = false;
    for ch in text.chars() {
        if ch == '\n' {
            if !last_was_newline {
                out.push_str(EOL);
            }
            last_was_newline = true;
        } else {
            last_was_newline = false;
            out.push(ch);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Punct(char),
    Spread,
}

fn lex(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '\'' || c == '"' {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => return Err("unterminated string literal".to_string()),
                    },
                    Some(ch) if ch == c => break,
                    Some(ch) => value.push(ch),
                    None => return Err("unterminated string literal".to_string()),
                }
            }
            tokens.push(Token::Str(value));
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            let mut ident = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                    ident.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(ident));
        } else if c == '.' {
            chars.next();
            if chars.peek() == Some(&'.') {
                chars.next();
                if chars.next() != Some('.') {
                    return Err("unexpected '..'".to_string());
                }
                tokens.push(Token::Spread);
            } else {
                tokens.push(Token::Punct('.'));
            }
        } else if "=[]{}():,;".contains(c) {
            chars.next();
            tokens.push(Token::Punct(c));
        } else {
            return Err(format!("unexpected character '{c}'"));
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_ident(&mut self) -> Result<String, String> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            other => Err(format!("expected identifier, found {other:?}")),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<(), String> {
        match self.advance() {
            Some(Token::Punct(found)) if found == punct => Ok(()),
            other => Err(format!("expected '{punct}', found {other:?}")),
        }
    }

    fn eat_punct(&mut self, punct: char) -> bool {
        if self.peek() == Some(&Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, String> {
        match self.advance() {
            Some(Token::Ident(word)) if word == "const" => {
                let binding = self.expect_ident()?;
                self.expect_punct('=')?;
                match self.peek() {
                    Some(Token::Ident(callee)) if callee == "require" => {
                        self.pos += 1;
                        self.expect_punct('(')?;
                        let module = match self.advance() {
                            Some(Token::Str(module)) => module,
                            other => {
                                return Err(format!(
                                    "expected module path string in require(), found {other:?}"
                                ))
                            }
                        };
                        self.expect_punct(')')?;
                        let initializer = if self.eat_punct('(') {
                            self.expect_punct(')')?;
                            true
                        } else {
                            false
                        };
                        self.expect_punct(';')?;
                        Ok(Statement::Import { binding, module, initializer })
                    }
                    Some(Token::Punct('[')) => {
                        self.pos += 1;
                        let mut elements = Vec::new();
                        if !self.eat_punct(']') {
                            loop {
                                elements.push(self.parse_expr()?);
                                if self.eat_punct(',') {
                                    if self.eat_punct(']') {
                                        break;
                                    }
                                    continue;
                                }
                                self.expect_punct(']')?;
                                break;
                            }
                        }
                        self.expect_punct(';')?;
                        Ok(Statement::ListDecl { name: binding, elements })
                    }
                    other => Err(format!(
                        "unsupported initializer for 'const {binding}': {other:?}"
                    )),
                }
            }
            Some(Token::Ident(word)) if word == "module" => {
                self.expect_punct('.')?;
                let member = self.expect_ident()?;
                if member != "exports" {
                    return Err(format!("expected 'module.exports', found 'module.{member}'"));
                }
                self.expect_punct('=')?;
                self.expect_punct('[')?;
                let mut lists = Vec::new();
                if !self.eat_punct(']') {
                    loop {
                        match self.advance() {
                            Some(Token::Spread) => {}
                            other => {
                                return Err(format!(
                                    "expected spread element in module.exports, found {other:?}"
                                ))
                            }
                        }
                        lists.push(self.expect_ident()?);
                        if self.eat_punct(',') {
                            continue;
                        }
                        self.expect_punct(']')?;
                        break;
                    }
                }
                self.expect_punct(';')?;
                Ok(Statement::ExportAll { lists })
            }
            Some(other) => Err(format!("unexpected token {other:?}")),
            None => Err("unexpected end of file".to_string()),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Token::Str(value)) => Ok(Expr::Str(value)),
            Some(Token::Punct('{')) => {
                let mut properties = Vec::new();
                if !self.eat_punct('}') {
                    loop {
                        let key = self.expect_ident()?;
                        self.expect_punct(':')?;
                        let value = self.parse_expr()?;
                        properties.push((key, value));
                        if self.eat_punct(',') {
                            if self.eat_punct('}') {
                                break;
                            }
                            continue;
                        }
                        self.expect_punct('}')?;
                        break;
                    }
                }
                Ok(Expr::Object(properties))
            }
            other => Err(format!("unexpected token in expression: {other:?}")),
        }
    }
}
