// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! gRPC service binding for the dispatcher.

use async_trait::async_trait;
use tonic::{Request, Response, Status};

use crate::dispatch::deadline::deadline_from_metadata;
use crate::dispatch::Dispatcher;
use crate::proto::meshbench_v1::mesh_node_server::MeshNode;
use crate::proto::WorkUnit;

#[async_trait]
impl MeshNode for Dispatcher {
    async fn process(&self, request: Request<WorkUnit>) -> Result<Response<WorkUnit>, Status> {
        // Recover the caller's remaining budget so outbound fan-out calls
        // keep carrying the tree-wide deadline
        let deadline = deadline_from_metadata(request.metadata());
        let unit = request.into_inner();
        Ok(Response::new(Dispatcher::process(self, unit, deadline).await))
    }
}
