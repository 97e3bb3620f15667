use crate::channel::{self, AuthInterceptor};
use crate::convert;
use crate::pb::google::cloud::speech::v1beta1::speech_client::SpeechClient;
use crate::pb::google::longrunning::operations_client::OperationsClient;
use crate::pb::google::longrunning::GetOperationRequest;
use async_trait::async_trait;
use opscribe_core::{
    AuthConfig, OperationHandle, RecognitionRequest, ServiceConfig, SpeechError, SpeechService,
};
use std::time::Duration;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;

type AuthedChannel = InterceptedService<Channel, AuthInterceptor>;

/// gRPC transport: the submission client and the operations client share
/// one authenticated channel.
pub struct GrpcSpeechService {
    speech: SpeechClient<AuthedChannel>,
    operations: OperationsClient<AuthedChannel>,
    deadline: Duration,
}

impl GrpcSpeechService {
    /// Resolve credentials, open the channel, and build both clients over
    /// it. Missing credentials fail here, before any job is submitted.
    pub async fn connect(
        service: &ServiceConfig,
        auth: &AuthConfig,
    ) -> Result<Self, SpeechError> {
        let token = auth.resolve_token().ok_or_else(|| {
            SpeechError::Credentials(format!(
                "no access token: set `auth.token` or the `{}` environment variable",
                auth.token_env,
            ))
        })?;
        let interceptor = AuthInterceptor::new(&token)?;
        let channel = channel::connect(service).await?;

        tracing::debug!(endpoint = %service.endpoint, "connected to speech service");

        Ok(Self {
            speech: SpeechClient::with_interceptor(channel.clone(), interceptor.clone()),
            operations: OperationsClient::with_interceptor(channel, interceptor),
            deadline: service.rpc_deadline(),
        })
    }

    fn request_with_deadline<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(self.deadline);
        request
    }
}

#[async_trait]
impl SpeechService for GrpcSpeechService {
    async fn start_recognition(
        &mut self,
        request: &RecognitionRequest,
    ) -> Result<OperationHandle, SpeechError> {
        let response = self
            .speech
            .async_recognize(self.request_with_deadline(convert::map_request(request)))
            .await
            .map_err(|status| SpeechError::Transport(status.to_string()))?;
        Ok(convert::map_operation(response.into_inner()))
    }

    async fn get_operation(&mut self, name: &str) -> Result<OperationHandle, SpeechError> {
        let response = self
            .operations
            .get_operation(self.request_with_deadline(GetOperationRequest {
                name: name.to_string(),
            }))
            .await
            .map_err(|status| SpeechError::Transport(status.to_string()))?;
        Ok(convert::map_operation(response.into_inner()))
    }
}
