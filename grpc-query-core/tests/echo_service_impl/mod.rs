use echo_service::EchoService;
use echo_service::pb::{EchoRequest, EchoResponse};
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tonic::{Request, Response, Status, Streaming};

/// Requests with this message fail, after sending one message when streaming.
pub const FAILING_MESSAGE: &str = "boom";

pub struct EchoServiceImpl;

#[tonic::async_trait]
impl EchoService for EchoServiceImpl {
    type ServerStreamingEchoStream = ReceiverStream<Result<EchoResponse, Status>>;

    async fn unary_echo(
        &self,
        request: Request<EchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let trace = request.metadata().get("x-trace").cloned();
        let message = request.into_inner().message;

        if message == FAILING_MESSAGE {
            return Err(Status::invalid_argument(FAILING_MESSAGE));
        }

        let mut response = Response::new(EchoResponse { message, seq: 0 });
        if let Some(trace) = trace {
            response.metadata_mut().insert("x-trace", trace);
        }
        Ok(response)
    }

    async fn server_streaming_echo(
        &self,
        request: Request<EchoRequest>,
    ) -> Result<Response<Self::ServerStreamingEchoStream>, Status> {
        let EchoRequest { message, repeat } = request.into_inner();
        let (tx, rx) = mpsc::channel(4);

        tokio::spawn(async move {
            if message == FAILING_MESSAGE {
                let first = EchoResponse {
                    message: message.clone(),
                    seq: 0,
                };
                tx.send(Ok(first)).await.ok();
                tx.send(Err(Status::aborted(FAILING_MESSAGE))).await.ok();
                return;
            }

            for seq in 0..repeat {
                let response = EchoResponse {
                    message: format!("{} - seq {}", message, seq),
                    seq,
                };
                tx.send(Ok(response)).await.ok();
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn client_streaming_echo(
        &self,
        request: Request<Streaming<EchoRequest>>,
    ) -> Result<Response<EchoResponse>, Status> {
        let mut stream = request.into_inner();
        let mut full_msg = String::new();

        while let Some(req) = stream.next().await {
            full_msg.push_str(&req?.message);
        }

        Ok(Response::new(EchoResponse {
            message: full_msg,
            seq: 0,
        }))
    }
}
