//! # Typed Sync Client
//!
//! Wraps a [`Gateway`] with the requests and pushes the builder sends.
//! Requests decode the parent's reply; pushes only wait for the acknowledgement.

use crate::{
    DiscussionIdResponse, EventName, FieldDataRequest, FieldDataResponse, FieldMetadataRequest,
    FieldSchemaRequest, FieldSchemaResponse, FocusFieldPayload, Gateway, InstancePayload,
    InstancePosition, PushHandler, Registration, SyncError, SyncResult, UpdateFieldPayload,
    VariantPermissions, NEW_DISCUSSION_ID,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;
use visual_builder_cslp::FieldAddress;
use visual_builder_schema::FieldSchema;

#[derive(Clone)]
pub struct SyncClient {
    gateway: Rc<dyn Gateway>,
}

impl SyncClient {
    pub fn new(gateway: Rc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Rc<dyn Gateway> {
        &self.gateway
    }

    async fn request<Req, Res>(&self, event: EventName, request: &Req) -> SyncResult<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let payload =
            serde_json::to_value(request).map_err(|e| SyncError::payload(event, e))?;
        let response = self.gateway.send(event, payload).await?;
        serde_json::from_value(response).map_err(|e| SyncError::payload(event, e))
    }

    async fn push<Req: Serialize>(&self, event: EventName, payload: &Req) -> SyncResult<()> {
        let payload =
            serde_json::to_value(payload).map_err(|e| SyncError::payload(event, e))?;
        self.gateway.send(event, payload).await?;
        Ok(())
    }

    /// Schema tree of a content type
    pub async fn get_field_schema(&self, content_type_uid: &str) -> SyncResult<Vec<FieldSchema>> {
        let response: FieldSchemaResponse = self
            .request(
                EventName::GetFieldSchema,
                &FieldSchemaRequest {
                    content_type_uid: content_type_uid.to_string(),
                },
            )
            .await?;
        Ok(response.field_schema_map)
    }

    /// Stored value of a field, unformatted
    pub async fn get_field_data(&self, address: &FieldAddress) -> SyncResult<Value> {
        let response: FieldDataResponse = self
            .request(
                EventName::GetFieldData,
                &FieldDataRequest {
                    field_metadata: address.clone(),
                    entry_uid: address.entry_uid.clone(),
                },
            )
            .await?;
        Ok(response.field_data)
    }

    pub async fn get_resolved_variant_permissions(
        &self,
        address: &FieldAddress,
    ) -> SyncResult<VariantPermissions> {
        self.request(
            EventName::GetResolvedVariantPermissions,
            &FieldMetadataRequest {
                field_metadata: address.clone(),
            },
        )
        .await
    }

    /// Existing discussion for a field, or [`NEW_DISCUSSION_ID`] when the
    /// lookup fails.
    pub async fn get_discussion_id(&self, address: &FieldAddress) -> String {
        let response: SyncResult<DiscussionIdResponse> = self
            .request(
                EventName::GetDiscussionId,
                &FieldMetadataRequest {
                    field_metadata: address.clone(),
                },
            )
            .await;
        match response {
            Ok(response) => response.discussion_id,
            Err(error) => {
                tracing::warn!("Failed to fetch discussion id for {}: {}", address.cslp_value, error);
                NEW_DISCUSSION_ID.to_string()
            }
        }
    }

    pub async fn focus_field(&self, dom_edit_stack: Vec<FieldAddress>) -> SyncResult<()> {
        self.push(EventName::FocusField, &FocusFieldPayload { dom_edit_stack })
            .await
    }

    pub async fn update_field(&self, address: &FieldAddress, data: Value) -> SyncResult<()> {
        self.push(
            EventName::UpdateField,
            &UpdateFieldPayload {
                data,
                field_metadata: address.clone(),
            },
        )
        .await
    }

    pub async fn add_instance(&self, address: &FieldAddress, index: usize) -> SyncResult<()> {
        self.push(
            EventName::AddInstance,
            &InstancePayload {
                field_metadata: address.clone(),
                index: Some(index),
                direction: None,
            },
        )
        .await
    }

    pub async fn delete_instance(&self, address: &FieldAddress, index: usize) -> SyncResult<()> {
        self.push(
            EventName::DeleteInstance,
            &InstancePayload {
                field_metadata: address.clone(),
                index: Some(index),
                direction: None,
            },
        )
        .await
    }

    pub async fn move_instance(
        &self,
        address: &FieldAddress,
        index: usize,
        direction: InstancePosition,
    ) -> SyncResult<()> {
        self.push(
            EventName::MoveInstance,
            &InstancePayload {
                field_metadata: address.clone(),
                index: Some(index),
                direction: Some(direction),
            },
        )
        .await
    }

    pub fn on(&self, event: EventName, handler: PushHandler) -> Registration {
        self.gateway.on(event, handler)
    }
}
