//! The mock session.
//!
//! A [`MockAjax`] owns everything the mock needs: the request registry, the
//! configuration and, while installed, the library it is installed into with
//! the hook it displaced. There is no process-wide state; two sessions never
//! see each other's requests.
//!
//! Dropping an installed session restores the library's original transport,
//! so a test that forgets to uninstall cannot leak the mock into the next.

use crate::config::MockAjaxConfig;
use crate::errors::MockAjaxError;
use crate::libraries::{Environment, Mode, TransportHost};
use crate::mock::{FakeRequestHandle, MockTransport, RequestRegistry};
use crate::net::TransportHandle;
use std::rc::Rc;

struct Installation {
    host: Rc<dyn TransportHost>,
    /// Hook found at install time, put back on uninstall.
    real: TransportHandle,
    mock: TransportHandle,
}

pub struct MockAjax {
    config: MockAjaxConfig,
    registry: Rc<RequestRegistry>,
    installation: Option<Installation>,
}

impl MockAjax {
    // Creates a session with the given configuration, or the default one when None.
    pub fn new(config: Option<MockAjaxConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
            registry: Rc::new(RequestRegistry::new()),
            installation: None,
        }
    }

    pub fn config(&self) -> &MockAjaxConfig {
        &self.config
    }

    /// Installs the mock unless it is already installed.
    pub fn use_mock(&mut self, env: &Environment) -> Result<(), MockAjaxError> {
        if !self.is_installed() {
            self.install_mock(env)?;
        }
        Ok(())
    }

    /// Installs the mock into the library `env` provides (jQuery first, then
    /// Prototype, then Sencha Touch). A no-op when already installed.
    pub fn install_mock(&mut self, env: &Environment) -> Result<(), MockAjaxError> {
        if self.is_installed() {
            log::debug!("MockAjax: already installed in {:?}, ignoring install", self.mode());
            return Ok(());
        }

        let host = env.detect().ok_or(MockAjaxError::UnsupportedLibrary)?;
        self.install_host(host);
        Ok(())
    }

    /// Installs the mock into an explicitly chosen library. A no-op when
    /// already installed.
    pub fn install_host(&mut self, host: Rc<dyn TransportHost>) {
        if self.is_installed() {
            log::debug!("MockAjax: already installed in {:?}, ignoring install", self.mode());
            return;
        }

        let timeout = host.timeout().unwrap_or(self.config.default_timeout);
        let mock: TransportHandle = Rc::new(MockTransport::new(
            self.registry.clone(),
            host.status_policy(),
            timeout,
            self.config.default_content_type.as_str(),
        ));
        let real = host.swap_transport(mock.clone());

        log::debug!("MockAjax: installed into {}", host.mode());
        self.installation = Some(Installation { host, real, mock });
    }

    /// Restores the library's original transport.
    pub fn uninstall_mock(&mut self) -> Result<(), MockAjaxError> {
        let installation = self.installation.take().ok_or(MockAjaxError::NotInstalled)?;
        restore(installation);
        Ok(())
    }

    /// Uninstalls if installed and forgets all requests.
    pub fn reset(&mut self) {
        if let Some(installation) = self.installation.take() {
            restore(installation);
        }
        self.registry.clear();
    }

    pub fn is_installed(&self) -> bool {
        self.installation.is_some()
    }

    pub fn assert_installed(&self) -> Result<(), MockAjaxError> {
        if self.is_installed() {
            Ok(())
        } else {
            Err(MockAjaxError::NotInstalled)
        }
    }

    /// The library the mock is installed into.
    pub fn mode(&self) -> Option<Mode> {
        self.installation.as_ref().map(|i| i.host.mode())
    }

    /// The transport that was in the hook before the mock replaced it.
    pub fn real_transport(&self) -> Option<TransportHandle> {
        self.installation.as_ref().map(|i| i.real.clone())
    }

    /// The transport the mock put into the hook.
    pub fn mock_transport(&self) -> Option<TransportHandle> {
        self.installation.as_ref().map(|i| i.mock.clone())
    }

    pub fn most_recent_request(&self) -> Result<Option<FakeRequestHandle>, MockAjaxError> {
        self.assert_installed()?;
        Ok(self.registry.most_recent())
    }

    pub fn request(&self, index: usize) -> Result<Option<FakeRequestHandle>, MockAjaxError> {
        self.assert_installed()?;
        Ok(self.registry.get(index))
    }

    pub fn requests(&self) -> Result<Vec<FakeRequestHandle>, MockAjaxError> {
        self.assert_installed()?;
        Ok(self.registry.all())
    }

    pub fn request_count(&self) -> Result<usize, MockAjaxError> {
        self.assert_installed()?;
        Ok(self.registry.len())
    }

    pub fn clear_requests(&self) -> Result<(), MockAjaxError> {
        self.assert_installed()?;
        self.registry.clear();
        Ok(())
    }
}

impl Drop for MockAjax {
    fn drop(&mut self) {
        if let Some(installation) = self.installation.take() {
            restore(installation);
        }
    }
}

fn restore(installation: Installation) {
    let Installation { host, real, mock } = installation;
    let displaced = host.swap_transport(real);
    if !Rc::ptr_eq(&displaced, &mock) {
        log::warn!("MockAjax: {} hook was replaced while the mock was installed", host.mode());
    }
    log::debug!("MockAjax: uninstalled from {}", host.mode());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::jquery::JQueryAjaxOptions;
    use crate::libraries::{Ext, JQuery, Prototype};
    use crate::mock::ResponseSpec;
    use crate::net::{Callbacks, RequestParts, Transport};
    use crate::testing::init_logging;
    use std::time::Duration;

    struct Libraries {
        jquery: Rc<JQuery>,
        prototype: Rc<Prototype>,
        ext: Rc<Ext>,
        env: Environment,
    }

    fn libraries() -> Libraries {
        init_logging();
        let jquery = Rc::new(JQuery::new());
        let prototype = Rc::new(Prototype::new());
        let ext = Rc::new(Ext::new());
        let env = Environment::new()
            .with_jquery(jquery.clone())
            .with_prototype(prototype.clone())
            .with_ext(ext.clone());
        Libraries { jquery, prototype, ext, env }
    }

    #[test]
    fn is_installed_tracks_install_state() {
        let libs = libraries();
        let mut mock = MockAjax::new(None);
        assert!(!mock.is_installed());

        mock.install_mock(&libs.env).unwrap();
        assert!(mock.is_installed());

        mock.uninstall_mock().unwrap();
        assert!(!mock.is_installed());
    }

    #[test]
    fn assert_installed() {
        let libs = libraries();
        let mut mock = MockAjax::new(None);
        let err = mock.assert_installed().unwrap_err();
        assert_eq!(err.to_string(), "Mock ajax is not installed, use jasmine.Ajax.useMock()");

        mock.use_mock(&libs.env).unwrap();
        assert!(mock.assert_installed().is_ok());
    }

    #[test]
    fn installs_into_jquery() {
        let libs = libraries();
        let env = libs.env.without(&[Mode::SenchaTouch, Mode::Prototype]);
        let original = libs.jquery.transport();

        let mut mock = MockAjax::new(None);
        mock.install_mock(&env).unwrap();

        assert_eq!(mock.mode(), Some(Mode::JQuery));
        assert!(Rc::ptr_eq(&libs.jquery.ajax_settings.xhr.get(), &mock.mock_transport().unwrap()));
        assert!(Rc::ptr_eq(&mock.real_transport().unwrap(), &original));
    }

    #[test]
    fn installs_into_prototype() {
        let libs = libraries();
        let env = libs.env.without(&[Mode::JQuery, Mode::SenchaTouch]);
        let original = libs.prototype.transport();

        let mut mock = MockAjax::new(None);
        mock.install_mock(&env).unwrap();

        assert_eq!(mock.mode(), Some(Mode::Prototype));
        assert!(Rc::ptr_eq(&libs.prototype.get_transport.get(), &mock.mock_transport().unwrap()));
        assert!(Rc::ptr_eq(&mock.real_transport().unwrap(), &original));
    }

    #[test]
    fn installs_into_sencha_touch() {
        let libs = libraries();
        let env = libs.env.without(&[Mode::JQuery, Mode::Prototype]);
        let original = libs.ext.ajax.get_xhr_instance.get();

        let mut mock = MockAjax::new(None);
        mock.install_mock(&env).unwrap();

        assert_eq!(mock.mode(), Some(Mode::SenchaTouch));
        assert!(Rc::ptr_eq(&libs.ext.transport(), &mock.mock_transport().unwrap()));
        assert!(Rc::ptr_eq(&mock.real_transport().unwrap(), &original));
    }

    #[test]
    fn install_without_supported_library_fails() {
        let libs = libraries();
        let env = libs.env.without(&[Mode::JQuery, Mode::Prototype, Mode::SenchaTouch]);

        let mut mock = MockAjax::new(None);
        let err = mock.install_mock(&env).unwrap_err();
        assert_eq!(err, MockAjaxError::UnsupportedLibrary);
        assert_eq!(err.to_string(), "jasmine.Ajax currently only supports jQuery and Prototype");
        assert!(!mock.is_installed());
        assert!(mock.mode().is_none());
    }

    #[test]
    fn installing_twice_is_a_no_op() {
        let libs = libraries();
        let original = libs.jquery.transport();
        let mut mock = MockAjax::new(None);

        mock.install_mock(&libs.env).unwrap();
        let first = mock.mock_transport().unwrap();
        mock.install_mock(&libs.env).unwrap();
        mock.install_host(libs.ext.clone());

        assert_eq!(mock.mode(), Some(Mode::JQuery));
        assert!(Rc::ptr_eq(&mock.mock_transport().unwrap(), &first));
        assert!(Rc::ptr_eq(&mock.real_transport().unwrap(), &original));
        assert!(Rc::ptr_eq(&libs.jquery.transport(), &first));
    }

    #[test]
    fn use_mock_does_not_reinstall() {
        let libs = libraries();
        let mut mock = MockAjax::new(None);

        mock.use_mock(&libs.env).unwrap();
        let first = mock.mock_transport().unwrap();

        // An environment without libraries would fail a real install.
        mock.use_mock(&Environment::new()).unwrap();
        assert!(Rc::ptr_eq(&mock.mock_transport().unwrap(), &first));
    }

    #[test]
    fn use_mock_propagates_unsupported_library() {
        let mut mock = MockAjax::new(None);
        assert_eq!(mock.use_mock(&Environment::new()), Err(MockAjaxError::UnsupportedLibrary));
    }

    #[test]
    fn uninstall_restores_jquery() {
        let libs = libraries();
        let original = libs.jquery.transport();
        let mut mock = MockAjax::new(None);

        mock.install_mock(&libs.env.without(&[Mode::Prototype, Mode::SenchaTouch])).unwrap();
        mock.uninstall_mock().unwrap();

        assert!(Rc::ptr_eq(&libs.jquery.transport(), &original));
        assert!(mock.mode().is_none());
        assert!(mock.real_transport().is_none());
    }

    #[test]
    fn uninstall_restores_prototype() {
        let libs = libraries();
        let original = libs.prototype.transport();
        let mut mock = MockAjax::new(None);

        mock.install_mock(&libs.env.without(&[Mode::JQuery, Mode::SenchaTouch])).unwrap();
        mock.uninstall_mock().unwrap();

        assert!(Rc::ptr_eq(&libs.prototype.transport(), &original));
    }

    #[test]
    fn uninstall_when_not_installed_fails() {
        let mut mock = MockAjax::new(None);
        let err = mock.uninstall_mock().unwrap_err();
        assert_eq!(err.to_string(), "Mock ajax is not installed, use jasmine.Ajax.useMock()");
    }

    #[test]
    fn inspection_requires_install() {
        let mock = MockAjax::new(None);
        assert_eq!(mock.most_recent_request().unwrap_err(), MockAjaxError::NotInstalled);
        assert_eq!(mock.request(0).unwrap_err(), MockAjaxError::NotInstalled);
        assert_eq!(mock.requests().unwrap_err(), MockAjaxError::NotInstalled);
        assert_eq!(mock.request_count().unwrap_err(), MockAjaxError::NotInstalled);
        assert_eq!(mock.clear_requests().unwrap_err(), MockAjaxError::NotInstalled);
    }

    #[test]
    fn registry_holds_requests_in_issuance_order() {
        let libs = libraries();
        let mut mock = MockAjax::new(None);
        mock.use_mock(&libs.env).unwrap();

        for i in 0..4 {
            libs.jquery.ajax(JQueryAjaxOptions::new(format!("example.com/{i}")));
        }

        let requests = mock.requests().unwrap();
        assert_eq!(requests.len(), 4);
        assert_eq!(mock.request_count().unwrap(), 4);
        for (i, request) in requests.iter().enumerate() {
            assert_eq!(request.url(), format!("example.com/{i}"));
        }
        assert!(Rc::ptr_eq(&mock.most_recent_request().unwrap().unwrap(), &requests[3]));

        mock.clear_requests().unwrap();
        assert_eq!(mock.request_count().unwrap(), 0);
        assert!(mock.most_recent_request().unwrap().is_none());
    }

    #[test]
    fn sessions_are_isolated() {
        let first_libs = libraries();
        let second_libs = libraries();
        let mut first = MockAjax::new(None);
        let mut second = MockAjax::new(None);
        first.use_mock(&first_libs.env).unwrap();
        second.use_mock(&second_libs.env).unwrap();

        first_libs.jquery.ajax(JQueryAjaxOptions::new("example.com/first"));

        assert_eq!(first.request_count().unwrap(), 1);
        assert_eq!(second.request_count().unwrap(), 0);
    }

    #[test]
    fn drop_restores_original_transport() {
        let libs = libraries();
        let original = libs.jquery.transport();
        {
            let mut mock = MockAjax::new(None);
            mock.use_mock(&libs.env).unwrap();
            assert!(!Rc::ptr_eq(&libs.jquery.transport(), &original));
        }
        assert!(Rc::ptr_eq(&libs.jquery.transport(), &original));
    }

    #[test]
    fn reset_uninstalls_and_forgets_requests() {
        let libs = libraries();
        let original = libs.jquery.transport();
        let mut mock = MockAjax::new(None);
        mock.use_mock(&libs.env).unwrap();
        libs.jquery.ajax(JQueryAjaxOptions::new("example.com/someApi"));

        mock.reset();

        assert!(!mock.is_installed());
        assert!(Rc::ptr_eq(&libs.jquery.transport(), &original));
        mock.use_mock(&libs.env).unwrap();
        assert_eq!(mock.request_count().unwrap(), 0);

        // Resetting an uninstalled session is fine too.
        mock.reset();
        mock.reset();
    }

    #[test]
    fn requests_survive_uninstall_and_can_still_be_answered() {
        let libs = libraries();
        let mut mock = MockAjax::new(None);
        mock.use_mock(&libs.env).unwrap();
        libs.jquery.ajax(JQueryAjaxOptions::new("example.com/someApi"));
        let request = mock.most_recent_request().unwrap().unwrap();

        mock.uninstall_mock().unwrap();
        request.respond(&ResponseSpec::new().with_status(200));
        assert_eq!(request.status(), Some(200));

        mock.use_mock(&libs.env).unwrap();
        assert_eq!(mock.request_count().unwrap(), 1);
    }

    #[test]
    fn config_drives_fake_request_defaults() {
        let libs = libraries();
        let config = MockAjaxConfig::builder()
            .default_content_type("text/plain")
            .default_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let mut mock = MockAjax::new(Some(config));
        mock.install_host(libs.prototype.clone());

        libs.prototype.request("example.com/someApi", Default::default());
        let request = mock.most_recent_request().unwrap().unwrap();
        // Prototype has no timeout of its own.
        assert_eq!(request.timeout(), Duration::from_secs(2));

        request.respond(&ResponseSpec::new().with_status(200));
        assert_eq!(request.response().unwrap().get_response_header("Content-type"), Some("text/plain"));
    }

    #[test]
    fn uninstall_over_foreign_hook_still_restores() {
        struct Foreign;
        impl Transport for Foreign {
            fn issue(&self, _request: RequestParts, _callbacks: Callbacks) {}
        }

        let libs = libraries();
        let original = libs.jquery.transport();
        let mut mock = MockAjax::new(None);
        mock.use_mock(&libs.env).unwrap();

        libs.jquery.swap_transport(Rc::new(Foreign));
        mock.uninstall_mock().unwrap();

        assert!(Rc::ptr_eq(&libs.jquery.transport(), &original));
    }
}
