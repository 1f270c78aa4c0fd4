pub mod numeric;
pub mod providers;
pub mod resolver;
pub mod validator;

pub use resolver::AnswerResolver;
