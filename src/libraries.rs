//! Client libraries a mock session can be installed into.
//!
//! Each library is a small AJAX client with the request API of the library it
//! is named after, plus one swappable **transport hook**: the single place it
//! asks for a transport whenever a request is issued. Installing the mock
//! means swapping that hook; uninstalling means putting the saved one back.
//!
//! | Library            | Hook                                           | Status policy |
//! |--------------------|------------------------------------------------|---------------|
//! | [`JQuery`]         | `jQuery.ajaxSettings.xhr`                      | `HttpSuccess` |
//! | [`Prototype`]      | `Ajax.getTransport`                            | `Truthy`      |
//! | [`Ext`]            | `Ext.data.Connection.prototype.getXhrInstance` | `HttpSuccess` |
//!
//! An [`Environment`] lists the libraries available to a test and picks
//! which one a session installs into.

pub mod jquery;
pub mod prototype;
pub mod sencha_touch;

use crate::net::{StatusPolicy, TransportHandle};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

pub use jquery::JQuery;
pub use prototype::Prototype;
pub use sencha_touch::Ext;

/// Which client library a session is installed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    JQuery,
    Prototype,
    SenchaTouch,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::JQuery => write!(f, "jQuery"),
            Mode::Prototype => write!(f, "Prototype"),
            Mode::SenchaTouch => write!(f, "SenchaTouch"),
        }
    }
}

/// A client library exposing a swappable transport hook.
pub trait TransportHost {
    fn mode(&self) -> Mode;

    /// The transport currently in the hook.
    fn transport(&self) -> TransportHandle;

    /// Puts `transport` into the hook and returns the one it replaced.
    fn swap_transport(&self, transport: TransportHandle) -> TransportHandle;

    /// How this library turns a status into success or failure.
    fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::Truthy
    }

    /// Request timeout configured on the library, if it has one.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

/// Storage for a library's transport hook.
pub struct TransportHook {
    current: RefCell<TransportHandle>,
}

impl TransportHook {
    pub fn new(transport: TransportHandle) -> Self {
        Self { current: RefCell::new(transport) }
    }

    pub fn get(&self) -> TransportHandle {
        self.current.borrow().clone()
    }

    pub fn replace(&self, transport: TransportHandle) -> TransportHandle {
        self.current.replace(transport)
    }
}

impl fmt::Debug for TransportHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransportHook({:p})", Rc::as_ptr(&*self.current.borrow()))
    }
}

/// The client libraries available to a test.
///
/// Replaces probing for well-known globals: tests list what is present, and
/// [`detect`](Self::detect) picks in the order jQuery, Prototype, Sencha
/// Touch.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub jquery: Option<Rc<JQuery>>,
    pub prototype: Option<Rc<Prototype>>,
    pub ext: Option<Rc<Ext>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jquery(mut self, jquery: Rc<JQuery>) -> Self {
        self.jquery = Some(jquery);
        self
    }

    pub fn with_prototype(mut self, prototype: Rc<Prototype>) -> Self {
        self.prototype = Some(prototype);
        self
    }

    pub fn with_ext(mut self, ext: Rc<Ext>) -> Self {
        self.ext = Some(ext);
        self
    }

    /// A copy of this environment with the given libraries removed.
    pub fn without(&self, modes: &[Mode]) -> Self {
        let mut env = self.clone();
        for mode in modes {
            match mode {
                Mode::JQuery => env.jquery = None,
                Mode::Prototype => env.prototype = None,
                Mode::SenchaTouch => env.ext = None,
            }
        }
        env
    }

    /// The library a session should install into, or `None` when no
    /// supported library is present.
    pub fn detect(&self) -> Option<Rc<dyn TransportHost>> {
        if let Some(jquery) = &self.jquery {
            return Some(jquery.clone() as Rc<dyn TransportHost>);
        }
        if let Some(prototype) = &self.prototype {
            return Some(prototype.clone() as Rc<dyn TransportHost>);
        }
        if let Some(ext) = &self.ext {
            return Some(ext.clone() as Rc<dyn TransportHost>);
        }
        None
    }
}
