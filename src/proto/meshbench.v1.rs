// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Rust types for the `meshbench.v1` wire contract (see proto/meshbench.v1.proto).
//!
//! The message and the tonic client/server here are implemented directly
//! rather than generated from the proto file at build time. The surface is a
//! single unary method, so hand-maintained plumbing avoids a protoc build
//! dependency while staying byte-compatible with protoc-generated peers.

/// One unit of work travelling through the service graph.
///
/// Field tags are fixed by the wire contract and must not change.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkUnit {
    /// Name of the node that sent this unit.
    #[prost(string, tag = "1")]
    pub origin: ::prost::alloc::string::String,
    /// Correlates all hops belonging to one benchmark run.
    #[prost(string, tag = "2")]
    pub bench_id: ::prost::alloc::string::String,
    /// Correlates all hops belonging to one request's call tree.
    #[prost(string, tag = "3")]
    pub trace_id: ::prost::alloc::string::String,
    /// Hop counter along one path of the call tree.
    #[prost(int32, tag = "4")]
    pub depth: i32,
}

/// Client for the `meshbench.v1.MeshNode` service.
pub mod mesh_node_client {
    use super::WorkUnit;
    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::transport::Channel;

    /// Full method path of the unary `Process` call.
    pub const PROCESS_PATH: &str = "/meshbench.v1.MeshNode/Process";

    /// Unary client over an established (possibly lazy) channel.
    ///
    /// Cloning is cheap; clones share the underlying HTTP/2 connection.
    #[derive(Debug, Clone)]
    pub struct MeshNodeClient {
        inner: tonic::client::Grpc<Channel>,
    }

    impl MeshNodeClient {
        pub fn new(channel: Channel) -> Self {
            Self {
                inner: tonic::client::Grpc::new(channel),
            }
        }

        /// Issue one `Process` call. Deadlines set on the request via
        /// `tonic::Request::set_timeout` are transmitted as `grpc-timeout`
        /// and enforced by the receiving server.
        pub async fn process(
            &mut self,
            request: tonic::Request<WorkUnit>,
        ) -> Result<tonic::Response<WorkUnit>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static(PROCESS_PATH);
            self.inner.unary(request, path, codec).await
        }
    }
}

/// Server-side trait and tower service for `meshbench.v1.MeshNode`.
pub mod mesh_node_server {
    use super::WorkUnit;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tonic::codegen::{empty_body, http, Body, BoxFuture, Service, StdError};

    /// Behavior backing the `MeshNode` service.
    #[async_trait]
    pub trait MeshNode: Send + Sync + 'static {
        async fn process(
            &self,
            request: tonic::Request<WorkUnit>,
        ) -> Result<tonic::Response<WorkUnit>, tonic::Status>;
    }

    /// Tower service adapter, registered with `tonic::transport::Server`.
    #[derive(Debug)]
    pub struct MeshNodeServer<T: MeshNode> {
        inner: Arc<T>,
    }

    impl<T: MeshNode> MeshNodeServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }

        /// Wrap an already-shared implementation, e.g. one that also serves
        /// an HTTP ingress.
        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T: MeshNode> Clone for MeshNodeServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<T: MeshNode> tonic::server::NamedService for MeshNodeServer<T> {
        const NAME: &'static str = "meshbench.v1.MeshNode";
    }

    impl<T, B> Service<http::Request<B>> for MeshNodeServer<T>
    where
        T: MeshNode,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(
            &mut self,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Result<(), Self::Error>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/meshbench.v1.MeshNode/Process" => {
                    struct ProcessSvc<T: MeshNode>(Arc<T>);
                    impl<T: MeshNode> tonic::server::UnaryService<WorkUnit> for ProcessSvc<T> {
                        type Response = WorkUnit;
                        type Future = BoxFuture<tonic::Response<WorkUnit>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<WorkUnit>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { inner.process(request).await })
                        }
                    }
                    let inner = Arc::clone(&self.inner);
                    Box::pin(async move {
                        let method = ProcessSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        Ok(grpc.unary(method, req).await)
                    })
                }
                _ => Box::pin(async move {
                    // UNIMPLEMENTED per the gRPC status mapping
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(empty_body())
                        .unwrap())
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn work_unit_round_trips_through_the_wire_encoding() {
        let unit = WorkUnit {
            origin: "svc-a".to_string(),
            bench_id: "run-42".to_string(),
            trace_id: "1700000000000000000".to_string(),
            depth: 3,
        };

        let bytes = unit.encode_to_vec();
        let decoded = WorkUnit::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, unit);
    }

    #[test]
    fn work_unit_default_encodes_empty() {
        // proto3 scalar defaults are omitted on the wire
        let unit = WorkUnit::default();
        assert!(unit.encode_to_vec().is_empty());
    }
}
