use std::future::Future;

use api_types::{capital_flow::CapitalFlowListResponse, category::CategoryView};
use flow_browser::{
    ConfirmPrompt, DeleteOutcome, FetchTicket, LedgerApi, RecordDraft, RemoteFailure,
    delete_with_confirmation, submit_record,
};
use tokio::sync::{mpsc, oneshot};

use crate::client::Client;

/// Result of a background remote call, drained by the event loop each tick.
#[derive(Debug)]
pub enum Completion {
    Categories(Result<Vec<CategoryView>, RemoteFailure>),
    Fetch {
        seq: u64,
        result: Result<CapitalFlowListResponse, RemoteFailure>,
    },
    Delete(DeleteOutcome),
    Saved(Result<(), RemoteFailure>),
}

/// Answer of the delete confirmation modal. A dropped sender counts as "no".
#[derive(Debug)]
pub struct ModalConfirm(pub oneshot::Receiver<bool>);

impl ConfirmPrompt for ModalConfirm {
    fn confirm(self) -> impl Future<Output = bool> + Send {
        async move { self.0.await.unwrap_or(false) }
    }
}

/// Spawns remote calls on the runtime and routes their results back.
#[derive(Debug, Clone)]
pub struct Tasks {
    client: Client,
    tx: mpsc::UnboundedSender<Completion>,
}

impl Tasks {
    pub fn new(client: Client) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, tx }, rx)
    }

    pub fn load_categories(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_categories().await;
            deliver(&tx, Completion::Categories(result));
        });
    }

    pub fn fetch(&self, ticket: FetchTicket) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let FetchTicket { seq, query } = ticket;
            tracing::debug!("fetch #{seq} page {}", query.page);
            let result = client.fetch_transactions(query).await;
            deliver(&tx, Completion::Fetch { seq, result });
        });
    }

    pub fn delete(&self, id: i64, prompt: ModalConfirm) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = delete_with_confirmation(&client, prompt, id).await;
            deliver(&tx, Completion::Delete(outcome));
        });
    }

    pub fn save(&self, record_id: Option<i64>, draft: RecordDraft) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = submit_record(&client, record_id, draft).await;
            deliver(&tx, Completion::Saved(result));
        });
    }
}

fn deliver(tx: &mpsc::UnboundedSender<Completion>, completion: Completion) {
    if let Err(err) = tx.send(completion) {
        tracing::debug!("completion dropped after shutdown: {:?}", err.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn modal_answers_reach_the_prompt() {
        let (tx, rx) = oneshot::channel();
        tx.send(true).unwrap();
        assert!(ModalConfirm(rx).confirm().await);

        let (tx, rx) = oneshot::channel::<bool>();
        drop(tx);
        assert!(!ModalConfirm(rx).confirm().await);
    }
}
