//! # Session-Guarded Services
//!
//! A page is opened once but used for as long as it stays on screen. [`Guarded`]
//! re-checks the session on every backend call, so signing out or switching to a
//! role without access turns the next delete, submit or reload into
//! [`ConsoleError::Unauthorized`] or [`ConsoleError::Forbidden`]. Results from the
//! wrapped service pass through [`SessionContext::intercept`].

use crate::error::ConsoleError;
use crate::modal::Validator;
use crate::page::{RecordId, ResourceLabels, ResourceService};
use crate::record::Fetched;
use crate::session::SessionContext;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A [`ResourceService`] that only reaches `inner` while the session may open `path`.
pub struct Guarded<S> {
    inner: Arc<S>,
    session: Arc<SessionContext>,
    path: &'static str,
}

impl<S> Guarded<S> {
    pub fn new(inner: Arc<S>, session: Arc<SessionContext>, path: &'static str) -> Self {
        Self {
            inner,
            session,
            path,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Fails unless the current session may open this page.
    pub fn authorize(&self) -> Result<(), ConsoleError> {
        self.session.authorize(self.path).map(|session| {
            debug!(path = self.path, username = %session.username, "Authorized");
        })
    }

    /// Runs `call` after [`authorize`](Self::authorize) and intercepts its result.
    pub async fn run<T, Fut>(&self, call: impl FnOnce() -> Fut) -> Result<T, ConsoleError>
    where
        Fut: std::future::Future<Output = Result<T, ConsoleError>>,
    {
        self.authorize()?;
        self.session.intercept(call().await)
    }
}

#[async_trait]
impl<S: ResourceService> ResourceService for Guarded<S> {
    type Record = S::Record;
    type Form = S::Form;
    type Filter = S::Filter;

    async fn list(&self, filter: S::Filter) -> Result<Fetched<S::Record>, ConsoleError> {
        self.run(|| self.inner.list(filter)).await
    }

    async fn create(&self, form: S::Form) -> Result<(), ConsoleError> {
        self.run(|| self.inner.create(form)).await
    }

    async fn update(&self, id: RecordId<Self>, form: S::Form) -> Result<(), ConsoleError> {
        self.run(|| self.inner.update(id, form)).await
    }

    async fn delete(&self, id: RecordId<Self>) -> Result<(), ConsoleError> {
        self.run(|| self.inner.delete(id)).await
    }

    fn edit_form(&self, record: &S::Record) -> S::Form {
        self.inner.edit_form(record)
    }

    fn labels(&self) -> ResourceLabels {
        self.inner.labels()
    }

    fn form_validator(&self) -> Option<Arc<dyn Validator<S::Form>>> {
        self.inner.form_validator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::CallCounter;
    use crate::modal::{FormModel, SubmitOutcome};
    use crate::notify::NotificationLog;
    use crate::page::CrudPage;
    use crate::record::Record;
    use crate::session::{Authenticator, Credentials, MemorySessionStore, Role, Session};
    use crate::validation::ValidationErrors;

    #[derive(Debug, Clone, PartialEq)]
    struct Notice {
        id: u32,
    }

    impl Record for Notice {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct NoticeForm {
        id: Option<u32>,
    }

    impl FormModel for NoticeForm {
        type Id = u32;

        fn record_id(&self) -> Option<u32> {
            self.id
        }

        fn validate(&self) -> Result<(), ValidationErrors> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct NoticeService {
        calls: CallCounter,
        expired: bool,
    }

    #[async_trait]
    impl ResourceService for NoticeService {
        type Record = Notice;
        type Form = NoticeForm;
        type Filter = ();

        async fn list(&self, _filter: ()) -> Result<Fetched<Notice>, ConsoleError> {
            self.calls.hit();
            Ok(vec![Notice { id: 1 }].into())
        }

        async fn create(&self, _form: NoticeForm) -> Result<(), ConsoleError> {
            self.calls.hit();
            Ok(())
        }

        async fn update(&self, _id: u32, _form: NoticeForm) -> Result<(), ConsoleError> {
            self.calls.hit();
            Ok(())
        }

        async fn delete(&self, _id: u32) -> Result<(), ConsoleError> {
            self.calls.hit();
            if self.expired {
                return Err(ConsoleError::Unauthorized);
            }
            Ok(())
        }

        fn edit_form(&self, record: &Notice) -> NoticeForm {
            NoticeForm { id: Some(record.id) }
        }

        fn labels(&self) -> ResourceLabels {
            ResourceLabels::new("notice")
        }
    }

    struct ByName;

    #[async_trait]
    impl Authenticator for ByName {
        async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ConsoleError> {
            let role = match credentials.username.as_str() {
                "admin" => Role::Admin,
                _ => Role::Accountant,
            };
            Ok(Session {
                token: "t".into(),
                username: credentials.username.clone(),
                role,
            })
        }
    }

    async fn signed_in(
        username: &str,
        service: NoticeService,
    ) -> (CrudPage<Guarded<NoticeService>>, Arc<SessionContext>, NotificationLog) {
        let session = Arc::new(SessionContext::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(ByName),
        ));
        session.login(username, "pw").await.unwrap();
        let log = NotificationLog::new();
        let guarded = Guarded::new(Arc::new(service), session.clone(), "/households");
        let page = CrudPage::mount(Arc::new(guarded), Arc::new(log.clone()));
        page.loader().settled().await;
        (page, session, log)
    }

    #[tokio::test]
    async fn test_signed_out_page_cannot_mutate() {
        let service = NoticeService::default();
        let calls = service.calls.clone();
        let (page, session, log) = signed_in("admin", service).await;
        assert_eq!(page.rows(), vec![Notice { id: 1 }]);
        session.logout();

        assert_eq!(page.delete_row(1).await, Err(ConsoleError::Unauthorized));
        assert_eq!(log.errors(), vec!["Delete failed"]);

        page.edit_row(&Notice { id: 1 });
        assert_eq!(page.submit().await, SubmitOutcome::Failed(ConsoleError::Unauthorized));
        assert!(page.modal().is_open());

        assert_eq!(page.refresh().await, Err(ConsoleError::Unauthorized));
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn test_role_without_access_is_forbidden() {
        let (page, session, _) = signed_in("admin", NoticeService::default()).await;
        session.logout();
        session.login("accountant", "pw").await.unwrap();

        assert_eq!(
            page.delete_row(1).await,
            Err(ConsoleError::Forbidden("/households".into()))
        );
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_unauthorized_answer_signs_out() {
        let service = NoticeService {
            expired: true,
            ..NoticeService::default()
        };
        let (page, session, _) = signed_in("admin", service).await;

        assert_eq!(page.delete_row(1).await, Err(ConsoleError::Unauthorized));
        assert!(!session.is_authenticated());
    }
}
