//! Protocol types and gRPC stubs compiled from `proto/provider.proto`.

tonic::include_proto!("pingfederate.provider.v1");
