/// Errors raised by the mock session.
///
/// The messages are fixed; tests match on them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockAjaxError {
    #[error("Mock ajax is not installed, use jasmine.Ajax.useMock()")]
    NotInstalled,

    #[error("jasmine.Ajax currently only supports jQuery and Prototype")]
    UnsupportedLibrary,
}
