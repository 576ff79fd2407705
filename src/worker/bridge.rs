use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, trace, warn};

use super::protocol::{CorrelationId, Message, Reply, Request, Response};
use crate::dto::{Channel, Payment};
use crate::query::PaymentQuery;
use crate::stores::TableRecords;
use crate::summary::PaymentSummary;
use crate::utils::random_hex;
use crate::Error;

type Pending = Arc<Mutex<HashMap<CorrelationId, oneshot::Sender<Response>>>>;

/// Caller side of the worker. Cheap to clone; clones share the same worker
/// and may issue overlapping requests. Responses are matched to requests by
/// correlation id only, so they may arrive in any order.
#[derive(Clone)]
pub struct Bridge {
    requests: mpsc::Sender<Message>,
    pending: Pending,
    timeout: Option<Duration>,
}

impl Bridge {
    /// Connects to a worker through its request and response queues.
    /// Spawns the response router, so must be called within a tokio runtime.
    pub fn new(
        requests: mpsc::Sender<Message>,
        responses: mpsc::Receiver<Response>,
        timeout: Option<Duration>,
    ) -> Self {
        let pending = Pending::default();
        tokio::spawn(route_responses(responses, pending.clone()));
        Self {
            requests,
            pending,
            timeout,
        }
    }

    /// Sends `request` and waits for the response carrying the same id.
    pub async fn call(&self, request: Request) -> Result<Option<Reply>, Error> {
        let id = random_hex();
        let name = request.name();
        let (waiter, response) = oneshot::channel();

        // Register before sending so a fast reply cannot be missed
        self.pending.lock().await.insert(id.clone(), waiter);
        let message = Message {
            id: id.clone(),
            request,
        };
        if self.requests.send(message).await.is_err() {
            self.pending.lock().await.remove(&id);
            return Err(Error::WorkerClosed);
        }
        trace!(%id, request = name, "request sent");

        let response = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, response).await {
                Ok(response) => response,
                Err(_) => {
                    self.pending.lock().await.remove(&id);
                    warn!(%id, request = name, "request timed out");
                    return Err(Error::Timeout);
                }
            },
            None => response.await,
        }
        .map_err(|_| Error::WorkerClosed)?;

        match response.error {
            Some(message) => Err(Error::Worker(message)),
            None => Ok(response.result),
        }
    }

    pub async fn update_channels(&self, channels: Vec<Channel>) -> Result<(), Error> {
        self.call(Request::UpdateChannels { channels }).await?;
        Ok(())
    }

    pub async fn update_transactions(&self, transactions: Vec<Payment>) -> Result<(), Error> {
        self.call(Request::UpdateTransactions { transactions })
            .await?;
        Ok(())
    }

    pub async fn bulk_put(&self, records: TableRecords) -> Result<(), Error> {
        self.call(Request::BulkPut(records)).await?;
        Ok(())
    }

    pub async fn last_paid_invoice(&self, wallet_id: Option<&str>) -> Result<Option<Payment>, Error> {
        let request = Request::GetLastPayIndex {
            wallet_id: wallet_id.map(str::to_string),
        };
        match self.call(request).await? {
            None => Ok(None),
            Some(Reply::Payment(payment)) => Ok(Some(*payment)),
            Some(_) => Err(Error::UnexpectedReply("get_lastpay_index")),
        }
    }

    pub async fn payment_summary(&self, payment: Payment) -> Result<PaymentSummary, Error> {
        let request = Request::GetPaymentSummary {
            payment: Box::new(payment),
        };
        match self.call(request).await? {
            Some(Reply::Summary(summary)) => Ok(*summary),
            _ => Err(Error::UnexpectedReply("get_payment_summary")),
        }
    }

    pub async fn all_tags(&self) -> Result<Vec<String>, Error> {
        match self.call(Request::GetAllTags).await? {
            Some(Reply::Tags(tags)) => Ok(tags),
            _ => Err(Error::UnexpectedReply("get_all_tags")),
        }
    }

    pub async fn payments(&self, query: PaymentQuery) -> Result<Vec<Payment>, Error> {
        match self.call(Request::GetPayments(query)).await? {
            Some(Reply::Payments(payments)) => Ok(payments),
            _ => Err(Error::UnexpectedReply("get_payments")),
        }
    }
}

/// Delivers each response to the caller waiting on its id. Once the worker
/// hangs up, every pending caller is released with a closed channel.
async fn route_responses(mut responses: mpsc::Receiver<Response>, pending: Pending) {
    while let Some(response) = responses.recv().await {
        let waiter = pending.lock().await.remove(&response.id);
        match waiter {
            Some(waiter) => {
                // Caller may have timed out in the meantime
                let _ = waiter.send(response);
            }
            None => debug!(id = %response.id, "no caller waiting for response"),
        }
    }
    pending.lock().await.clear();
}
