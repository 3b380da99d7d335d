//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{code, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    AddItemRequest, AddItemResponse, CreateListRequest, CreateListResponse, DeleteItemRequest,
    DeleteListRequest, DeletedResponse, ExportRequestParams, ExportRequestResponse,
    GetItemRequest, GetListRequest, ItemResponse, ListItemsRequest, ListItemsResponse,
    ListResponse, RenameListRequest, StatsRequest, StatsResponse, UpdateItemRequest,
    UpdatedResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use tasklist_core::application::export::{ExportRequest, ExportService};
use tasklist_core::application::ListService;
use tasklist_core::domain::ItemPatch;
use tasklist_core::port::{JobQueue, MessageState};
use std::sync::Arc;

/// Acknowledgment body returned on accepted export requests
const EXPORT_ACCEPTED_MESSAGE: &str =
    "Your export is being processed. You will receive it by email shortly.";

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    export_service: Arc<ExportService>,
    list_service: Arc<ListService>,
    queue: Arc<dyn JobQueue>,
    rate_limiter: Arc<RateLimiter>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(
        export_service: Arc<ExportService>,
        list_service: Arc<ListService>,
        queue: Arc<dyn JobQueue>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            export_service,
            list_service,
            queue,
            rate_limiter,
            start_time: std::time::Instant::now(),
        }
    }

    async fn check_rate_limit(&self) -> Result<(), ErrorObjectOwned> {
        if !self.rate_limiter.check().await {
            return Err(ErrorObjectOwned::owned(
                code::THROTTLED,
                "Rate limit exceeded. Please slow down.",
                None::<()>,
            ));
        }
        Ok(())
    }

    /// export.request.v1
    pub async fn request_export(
        &self,
        params: ExportRequestParams,
    ) -> Result<ExportRequestResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        let message_id = self
            .export_service
            .submit(ExportRequest {
                list_id: params.list_id,
                claims: params.claims,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(ExportRequestResponse {
            message_id,
            status: "ACCEPTED".to_string(),
            message: EXPORT_ACCEPTED_MESSAGE.to_string(),
        })
    }

    /// list.create.v1
    pub async fn create_list(
        &self,
        params: CreateListRequest,
    ) -> Result<CreateListResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        let list = self
            .list_service
            .create_list(&params.user_id, &params.name)
            .await
            .map_err(to_rpc_error)?;

        Ok(CreateListResponse {
            list_id: list.list_id,
        })
    }

    /// list.get.v1
    pub async fn get_list(
        &self,
        params: GetListRequest,
    ) -> Result<ListResponse, ErrorObjectOwned> {
        let list = self
            .list_service
            .get_list(&params.user_id, &params.list_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(list.into())
    }

    /// list.rename.v1
    pub async fn rename_list(
        &self,
        params: RenameListRequest,
    ) -> Result<UpdatedResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        self.list_service
            .rename_list(&params.user_id, &params.list_id, &params.name)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdatedResponse { updated: true })
    }

    /// list.delete.v1
    pub async fn delete_list(
        &self,
        params: DeleteListRequest,
    ) -> Result<DeletedResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        self.list_service
            .delete_list(&params.user_id, &params.list_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeletedResponse { deleted: true })
    }

    /// item.add.v1
    pub async fn add_item(
        &self,
        params: AddItemRequest,
    ) -> Result<AddItemResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        let item = self
            .list_service
            .add_item(&params.list_id, &params.text)
            .await
            .map_err(to_rpc_error)?;

        Ok(AddItemResponse {
            item_id: item.item_id,
        })
    }

    /// item.get.v1
    pub async fn get_item(
        &self,
        params: GetItemRequest,
    ) -> Result<ItemResponse, ErrorObjectOwned> {
        let item = self
            .list_service
            .get_item(&params.list_id, &params.item_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(item.into())
    }

    /// item.list.v1
    pub async fn list_items(
        &self,
        params: ListItemsRequest,
    ) -> Result<ListItemsResponse, ErrorObjectOwned> {
        let items = self
            .list_service
            .list_items(&params.list_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ListItemsResponse {
            items: items.into_iter().map(ItemResponse::from).collect(),
        })
    }

    /// item.update.v1
    pub async fn update_item(
        &self,
        params: UpdateItemRequest,
    ) -> Result<UpdatedResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        self.list_service
            .update_item(
                &params.list_id,
                &params.item_id,
                ItemPatch {
                    text: params.text,
                    completed: params.completed,
                },
            )
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdatedResponse { updated: true })
    }

    /// item.delete.v1
    pub async fn delete_item(
        &self,
        params: DeleteItemRequest,
    ) -> Result<DeletedResponse, ErrorObjectOwned> {
        self.check_rate_limit().await?;

        self.list_service
            .delete_item(&params.list_id, &params.item_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeletedResponse { deleted: true })
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        let queued = self
            .queue
            .count_by_state(MessageState::Queued)
            .await
            .map_err(to_rpc_error)?;
        let leased = self
            .queue
            .count_by_state(MessageState::Leased)
            .await
            .map_err(to_rpc_error)?;
        let done = self
            .queue
            .count_by_state(MessageState::Done)
            .await
            .map_err(to_rpc_error)?;
        let dead = self
            .queue
            .count_by_state(MessageState::Dead)
            .await
            .map_err(to_rpc_error)?;

        Ok(StatsResponse {
            queued_messages: queued,
            leased_messages: leased,
            done_messages: done,
            dead_messages: dead,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}
