pub mod ast;
pub mod cache;
pub mod cli;
pub mod encoders;
pub mod evaluator;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod record;
pub mod value;

pub use ast::{CompOp, Formula, Token};
pub use cache::UniqueCache;
pub use encoders::{Encoder, EncoderError, EncoderRegistry};
pub use evaluator::{ERROR_CODE, EvalContext, Evaluator, FilterError};
pub use filter::{ResFilter, placeholders_in};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser, parse_filter};
pub use path::{Combiner, FieldPath, LookupError};
pub use record::{FuzzResult, Record, SliceRecord};
pub use value::Value;
