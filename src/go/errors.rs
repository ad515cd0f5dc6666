use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoParserError {
    #[error("failed to set Go language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,
}
