pub mod channel;
pub mod convert;
pub mod null;
pub mod service;

/// Generated protobuf/gRPC stubs. Module nesting mirrors the proto
/// packages so cross-package references resolve.
pub mod pb {
    pub mod google {
        pub mod rpc {
            tonic::include_proto!("google.rpc");
        }
        pub mod longrunning {
            tonic::include_proto!("google.longrunning");
        }
        pub mod cloud {
            pub mod speech {
                pub mod v1beta1 {
                    tonic::include_proto!("google.cloud.speech.v1beta1");
                }
            }
        }
    }
}

pub use channel::AuthInterceptor;
pub use convert::{decode_operation_results, decode_recognition};
pub use null::NullService;
pub use service::GrpcSpeechService;
