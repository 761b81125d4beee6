//! UseCase: チャットハブ
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChatHub の接続ライフサイクル（on_connect / on_disconnect）
//! - SendMessage / SendMessageToCaller / SendMessageToGroup の配信先
//! - Connected 以外の状態での呼び出しが InvalidState になること
//!
//! ### なぜこのテストが必要か
//! - 接続直後に既定グループへ自動参加することを保証
//! - 呼び出し元だけへの送信が他の接続へ漏れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続、送信、グループ操作、キャッシュ参照
//! - 異常系：重複接続、切断後の呼び出し、未知のキャッシュ名

use std::sync::Arc;

use crate::domain::{
    ChatClient, ConnectionId, ConnectionRegistry, ConnectionState, GroupName, KeyedCaches,
    MessageBody, UserName,
};

use super::{
    broadcast::{DeliveryReport, GroupBroadcaster, Recipients},
    error::HubError,
};

/// Server-side chat hub.
///
/// The transport adapter calls `on_connect` when a session is established and
/// `on_disconnect` when it ends; everything in between requires the
/// connection to be `Connected`.
pub struct ChatHub {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// Fan-out of `ReceiveMessage` calls
    broadcaster: GroupBroadcaster,
    /// Caches resolved by name
    caches: KeyedCaches,
    /// Group every connection joins on connect
    default_group: GroupName,
}

impl ChatHub {
    /// 新しい ChatHub を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        broadcaster: GroupBroadcaster,
        caches: KeyedCaches,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            caches,
            default_group: GroupName::default_group(),
        }
    }

    /// Read access to the registry for snapshots
    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.registry
    }

    /// The group every connection joins on connect
    pub fn default_group(&self) -> &GroupName {
        &self.default_group
    }

    /// Session established: register, join the default group, become `Connected`.
    ///
    /// # Errors
    ///
    /// `HubError::Registry` if the id is already registered
    pub async fn on_connect(
        &self,
        id: ConnectionId,
        client: Arc<dyn ChatClient>,
    ) -> Result<(), HubError> {
        self.registry.register(id.clone(), client).await?;
        self.registry.join_group(&id, &self.default_group).await?;
        self.registry
            .set_state(&id, ConnectionState::Connected)
            .await?;

        tracing::info!(
            "Connection '{}' connected and joined '{}'",
            id,
            self.default_group
        );
        Ok(())
    }

    /// Session ended: unregister the connection and purge its groups.
    ///
    /// `error` is `None` for a close initiated by the client, `Some` for an
    /// abnormal termination. Both end in `Disconnected`; the error is only logged.
    /// Returns `false` if the connection was already gone.
    pub async fn on_disconnect(&self, id: &ConnectionId, error: Option<&str>) -> bool {
        match error {
            None => tracing::info!("Connection '{}' closed by client", id),
            Some(reason) => {
                tracing::warn!("Connection '{}' terminated abnormally: {}", id, reason)
            }
        }

        let removed = self.registry.unregister(id).await;
        if !removed {
            tracing::debug!("Connection '{}' was already unregistered", id);
        }
        removed
    }

    /// Broadcast to every connection
    pub async fn send_message(
        &self,
        caller: &ConnectionId,
        user: &UserName,
        message: &MessageBody,
    ) -> Result<DeliveryReport, HubError> {
        self.ensure_connected(caller).await?;
        Ok(self
            .broadcaster
            .deliver(&Recipients::All, user, message)
            .await)
    }

    /// Send back to the invoking connection only
    pub async fn send_message_to_caller(
        &self,
        caller: &ConnectionId,
        user: &UserName,
        message: &MessageBody,
    ) -> Result<DeliveryReport, HubError> {
        self.ensure_connected(caller).await?;
        Ok(self
            .broadcaster
            .deliver(&Recipients::Caller(caller.clone()), user, message)
            .await)
    }

    /// Broadcast to the default group
    pub async fn send_message_to_group(
        &self,
        caller: &ConnectionId,
        user: &UserName,
        message: &MessageBody,
    ) -> Result<DeliveryReport, HubError> {
        self.ensure_connected(caller).await?;
        Ok(self
            .broadcaster
            .deliver(&Recipients::Group(self.default_group.clone()), user, message)
            .await)
    }

    /// Add the caller to a group
    pub async fn add_to_group(
        &self,
        caller: &ConnectionId,
        group: &GroupName,
    ) -> Result<(), HubError> {
        self.ensure_connected(caller).await?;
        self.registry.join_group(caller, group).await?;
        tracing::info!("Connection '{}' joined '{}'", caller, group);
        Ok(())
    }

    /// Remove the caller from a group
    pub async fn remove_from_group(
        &self,
        caller: &ConnectionId,
        group: &GroupName,
    ) -> Result<(), HubError> {
        self.ensure_connected(caller).await?;
        self.registry.leave_group(caller, group).await;
        tracing::info!("Connection '{}' left '{}'", caller, group);
        Ok(())
    }

    /// Resolve `key` from the cache registered as `cache_name`
    pub async fn lookup_cache(
        &self,
        caller: &ConnectionId,
        cache_name: &str,
        key: &str,
    ) -> Result<String, HubError> {
        self.ensure_connected(caller).await?;
        let cache = self
            .caches
            .get(cache_name)
            .ok_or_else(|| HubError::UnknownCache(cache_name.to_string()))?;

        let value = cache.get(key);
        tracing::info!("{}", value);
        Ok(value)
    }

    async fn ensure_connected(&self, id: &ConnectionId) -> Result<(), HubError> {
        match self.registry.state(id).await {
            Some(ConnectionState::Connected) => Ok(()),
            state => Err(HubError::InvalidState {
                connection_id: id.clone(),
                state: state.unwrap_or(ConnectionState::Disconnected),
            }),
        }
    }
}
