//! Async driver pairing a [`Session`] with a [`Classifier`]
//!
//! At most one classification task is alive at a time, mirroring the
//! session's single pending request.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::ClassifyError;
use crate::gateway::{Classification, Classifier};
use crate::session::{Session, SubmitOutcome};

type ClassifyTask = JoinHandle<Result<Classification, ClassifyError>>;

pub struct Chat<C: Classifier> {
    session: Session,
    classifier: Arc<C>,
    task: Option<ClassifyTask>,
}

impl<C: Classifier> Chat<C> {
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            session: Session::new(),
            classifier,
            task: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Submit the current draft; spawns the classification when dispatched
    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.session.submit();
        if let SubmitOutcome::Dispatched(text) = &outcome {
            tracing::info!(chars = text.chars().count(), "review submitted");
            let classifier = Arc::clone(&self.classifier);
            let text = text.clone();
            self.task = Some(tokio::spawn(async move {
                classifier.classify(&text).await
            }));
        }
        outcome
    }

    /// Settle the in-flight request if it has finished. Returns true when a
    /// reply was appended.
    pub async fn poll_settled(&mut self) -> bool {
        let finished = self.task.as_ref().is_some_and(|task| task.is_finished());
        if finished {
            self.wait_settled().await
        } else {
            false
        }
    }

    /// Wait for the in-flight request, if any, and settle it
    pub async fn wait_settled(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(ClassifyError::connection(format!(
                "classification task ended abnormally: {}",
                join_err
            ))),
        };

        if let Ok(result) = &outcome {
            tracing::info!(
                sentiment = %result.sentiment,
                confidence = result.confidence,
                "classification settled"
            );
        }

        match self.session.settle(outcome) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "settled a request the session was not waiting for");
                false
            }
        }
    }
}

impl<C: Classifier> Drop for Chat<C> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageBody, Role, CONNECTION_FAILURE_NOTICE};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Replies with a fixed outcome once released, counting calls
    struct FakeClassifier {
        outcome: Result<Classification, ClassifyError>,
        calls: AtomicUsize,
        release: Notify,
    }

    impl FakeClassifier {
        fn new(outcome: Result<Classification, ClassifyError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                release: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl Classifier for FakeClassifier {
        async fn classify(&self, _text: &str) -> Result<Classification, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            self.outcome.clone()
        }
    }

    struct PanickingClassifier;

    #[async_trait]
    impl Classifier for PanickingClassifier {
        async fn classify(&self, _text: &str) -> Result<Classification, ClassifyError> {
            panic!("classifier blew up");
        }
    }

    fn positive() -> Result<Classification, ClassifyError> {
        Ok(Classification {
            sentiment: "긍정".to_string(),
            confidence: 0.87,
        })
    }

    #[tokio::test]
    async fn test_submit_then_settle_success() {
        let fake = FakeClassifier::new(positive());
        let mut chat = Chat::new(Arc::clone(&fake));

        chat.session_mut().set_draft("음식이 맛있어요");
        assert!(matches!(chat.submit(), SubmitOutcome::Dispatched(_)));
        assert_eq!(chat.session().messages().len(), 2);
        assert!(chat.session().is_awaiting());
        assert!(!chat.poll_settled().await);

        fake.release.notify_one();
        assert!(chat.wait_settled().await);

        let messages = chat.session().messages();
        assert_eq!(messages.len(), 3);
        assert!(!chat.session().is_awaiting());
        assert!(matches!(messages[2].body(), MessageBody::Verdict(v) if v.label == "긍정"));
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_submit_does_not_dispatch() {
        let fake = FakeClassifier::new(positive());
        let mut chat = Chat::new(Arc::clone(&fake));

        chat.session_mut().set_draft("첫 번째");
        chat.submit();
        chat.session_mut().set_draft("두 번째");
        assert_eq!(chat.submit(), SubmitOutcome::Busy);

        fake.release.notify_one();
        chat.wait_settled().await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
        let users = chat
            .session()
            .messages()
            .iter()
            .filter(|m| m.role() == Role::User)
            .count();
        assert_eq!(users, 1);
    }

    #[tokio::test]
    async fn test_failure_settles_with_notice() {
        let fake = FakeClassifier::new(Err(ClassifyError::connection("refused")));
        let mut chat = Chat::new(Arc::clone(&fake));

        chat.session_mut().set_draft("음식이 맛있어요");
        chat.submit();
        fake.release.notify_one();
        assert!(chat.wait_settled().await);

        let last = chat.session().messages().last().unwrap();
        assert_eq!(last.content(), CONNECTION_FAILURE_NOTICE);
        assert!(!chat.session().is_awaiting());
    }

    #[tokio::test]
    async fn test_panicking_task_settles_as_failure() {
        let mut chat = Chat::new(Arc::new(PanickingClassifier));

        chat.session_mut().set_draft("음식이 맛있어요");
        chat.submit();
        assert!(chat.wait_settled().await);

        assert_eq!(chat.session().messages().len(), 3);
        assert_eq!(
            chat.session().messages()[2].content(),
            CONNECTION_FAILURE_NOTICE
        );
        assert!(!chat.session().is_awaiting());
    }

    #[tokio::test]
    async fn test_nothing_to_settle_without_submission() {
        let fake = FakeClassifier::new(positive());
        let mut chat = Chat::new(fake);

        chat.session_mut().set_draft("   ");
        assert_eq!(chat.submit(), SubmitOutcome::Blank);
        assert!(!chat.poll_settled().await);
        assert!(!chat.wait_settled().await);
        assert_eq!(chat.session().messages().len(), 1);
    }
}
