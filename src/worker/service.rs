use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, trace, warn};

use super::protocol::{Message, Reply, Request, Response};
use crate::stores::RecordStore;
use crate::{Engine, Error};

/// Serves requests in receipt order until every request sender is dropped
/// or the response side hangs up. One request is handled at a time.
pub async fn serve<S: RecordStore>(
    engine: Engine<S>,
    requests: mpsc::Receiver<Message>,
    responses: mpsc::Sender<Response>,
) {
    let mut requests = ReceiverStream::new(requests);
    while let Some(Message { id, request }) = requests.next().await {
        let name = request.name();
        trace!(%id, request = name, "request received");

        let response = match handle(&engine, request).await {
            Ok(result) => Response::ok(id, result),
            Err(err) => {
                warn!(%id, request = name, error = %err, "request failed");
                Response::err(id, err)
            }
        };

        if responses.send(response).await.is_err() {
            // Bridge dropped, nobody left to answer
            break;
        }
    }
    debug!("worker stopped");
}

async fn handle<S: RecordStore>(
    engine: &Engine<S>,
    request: Request,
) -> Result<Option<Reply>, Error> {
    match request {
        Request::UpdateChannels { channels } => {
            engine.update_channels(channels).await?;
            Ok(None)
        }
        Request::UpdateTransactions { transactions } => {
            engine.update_transactions(transactions).await?;
            Ok(None)
        }
        Request::BulkPut(records) => {
            engine.bulk_put(records).await?;
            Ok(None)
        }
        Request::GetLastPayIndex { wallet_id } => Ok(engine
            .last_paid_invoice(wallet_id.as_deref())
            .await?
            .map(|payment| Reply::Payment(Box::new(payment)))),
        Request::GetPaymentSummary { payment } => {
            let summary = engine.payment_summary(&payment)?;
            Ok(Some(Reply::Summary(Box::new(summary))))
        }
        Request::GetAllTags => Ok(Some(Reply::Tags(engine.all_tags().await?))),
        Request::GetPayments(query) => Ok(Some(Reply::Payments(engine.payments(&query).await?))),
    }
}
