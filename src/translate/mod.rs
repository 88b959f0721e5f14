pub mod interface;
pub mod mock;
pub mod live;
pub mod factory;

pub use interface::{TranslateInterface, AUTO_SOURCE_LANGUAGE};
pub use mock::MockTranslator;
pub use live::LiveTranslator;
pub use factory::TranslateFactory;
