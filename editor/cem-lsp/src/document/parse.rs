//! Tree-sitter parsing

use thiserror::Error;
use tree_sitter::{Language, Parser, Tree};

/// Grammar used for a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Html,
    TypeScript,
    Tsx,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to load {grammar:?} grammar: {source}")]
    Grammar {
        grammar: Grammar,
        #[source]
        source: tree_sitter::LanguageError,
    },
}

impl Grammar {
    fn language(self) -> Language {
        match self {
            Self::Html => tree_sitter_html::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Parser configured for this grammar
    pub fn parser(self) -> Result<Parser, DocumentError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language())
            .map_err(|source| DocumentError::Grammar {
                grammar: self,
                source,
            })?;
        Ok(parser)
    }
}

/// Parse `text`, logging and returning `None` when no tree can be produced
pub fn parse(text: &str, grammar: Grammar) -> Option<Tree> {
    let mut parser = match grammar.parser() {
        Ok(parser) => parser,
        Err(err) => {
            tracing::warn!("{}", err);
            return None;
        }
    };
    parser.parse(text, None)
}
