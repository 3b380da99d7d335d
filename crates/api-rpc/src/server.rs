//! JSON-RPC Server
//!
//! Binds localhost TCP only; external exposure is the fronting gateway's job.

use crate::handler::RpcHandler;
use crate::rate_limiter::RateLimiter;
use crate::types::{
    AddItemRequest, CreateListRequest, DeleteItemRequest, DeleteListRequest, ExportRequestParams,
    GetItemRequest, GetListRequest, ListItemsRequest, RenameListRequest, StatsRequest,
    UpdateItemRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use tasklist_core::application::export::ExportService;
use tasklist_core::application::ListService;
use tasklist_core::port::JobQueue;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9538;
const DEFAULT_RATE_LIMIT_BURST: u32 = 200;
const DEFAULT_RATE_LIMIT_PER_SEC: u32 = 100;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_PER_SEC,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        export_service: Arc<ExportService>,
        list_service: Arc<ListService>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_burst,
            config.rate_limit_per_sec,
        ));
        Self {
            config,
            handler: Arc::new(RpcHandler::new(
                export_service,
                list_service,
                queue,
                rate_limiter,
            )),
        }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("export.request.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ExportRequestParams = params.parse()?;
                    handler.request_export(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("list.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateListRequest = params.parse()?;
                    handler.create_list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("list.get.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: GetListRequest = params.parse()?;
                    handler.get_list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("list.rename.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: RenameListRequest = params.parse()?;
                    handler.rename_list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("list.delete.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeleteListRequest = params.parse()?;
                    handler.delete_list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("item.add.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: AddItemRequest = params.parse()?;
                    handler.add_item(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("item.get.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: GetItemRequest = params.parse()?;
                    handler.get_item(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("item.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListItemsRequest = params.parse()?;
                    handler.list_items(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("item.update.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateItemRequest = params.parse()?;
                    handler.update_item(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("item.delete.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeleteItemRequest = params.parse()?;
                    handler.delete_item(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: StatsRequest = params.parse()?;
                    handler.stats(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
