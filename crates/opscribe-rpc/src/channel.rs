use opscribe_core::{ServiceConfig, SpeechError};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::transport::{Channel, ClientTlsConfig};
use tonic::{Request, Status};

/// Injects the bearer token as an `authorization` header on every call.
#[derive(Clone)]
pub struct AuthInterceptor {
    header: MetadataValue<Ascii>,
}

impl AuthInterceptor {
    pub fn new(token: &str) -> Result<Self, SpeechError> {
        // HeaderValue accepts multibyte UTF-8, so check ASCII ourselves;
        // the parse below only catches control characters.
        if !token.is_ascii() {
            return Err(SpeechError::Credentials(
                "token contains non-ASCII characters".to_string(),
            ));
        }
        let header = format!("Bearer {token}")
            .parse::<MetadataValue<Ascii>>()
            .map_err(|_| {
                SpeechError::Credentials("token contains control characters".to_string())
            })?;
        Ok(Self { header })
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.header.clone());
        Ok(request)
    }
}

/// Open the TLS channel used for submission and every subsequent poll. One
/// channel, opened once, reused for every call.
pub async fn connect(service: &ServiceConfig) -> Result<Channel, SpeechError> {
    let tls = ClientTlsConfig::new().with_native_roots();
    Channel::from_shared(service.endpoint.clone())
        .map_err(|err| SpeechError::Transport(format!("invalid endpoint: {err}")))?
        .tls_config(tls)
        .map_err(|err| SpeechError::Transport(format!("tls setup failed: {err}")))?
        .timeout(service.rpc_deadline())
        .connect()
        .await
        .map_err(|err| SpeechError::Transport(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interceptor_accepts_ascii_token() {
        assert!(AuthInterceptor::new("ya29.a0AfH6SMB-token").is_ok());
    }

    #[test]
    fn test_interceptor_rejects_non_ascii_token() {
        let err = AuthInterceptor::new("jeton-privé")
            .err()
            .expect("expected credentials error");
        match err {
            SpeechError::Credentials(message) => assert!(message.contains("non-ASCII")),
            other => panic!("expected Credentials error, got {other:?}"),
        }
    }

    #[test]
    fn test_interceptor_rejects_control_characters() {
        let result = AuthInterceptor::new("tok\nen");
        assert!(matches!(result, Err(SpeechError::Credentials(_))));
    }

    #[test]
    fn test_interceptor_sets_authorization_header() {
        let mut interceptor = AuthInterceptor::new("tok123").unwrap();
        let request = interceptor.call(Request::new(())).unwrap();
        let header = request.metadata().get("authorization").unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer tok123");
    }
}
