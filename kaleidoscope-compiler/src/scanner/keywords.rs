use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Token, Token::*};

/// Map of keywords to their respective Tokens.
pub static KEYWORDS: Lazy<HashMap<&'static str, Token>> =
    Lazy::new(|| [("def", Def), ("extern", Extern)].iter().cloned().collect());
