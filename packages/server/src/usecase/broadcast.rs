//! UseCase: 受信者集合へのファンアウト配信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GroupBroadcaster::deliver() メソッド
//! - 受信者セレクタ（All / Caller / Group）の解決と、接続ごとの独立した配信
//!
//! ### なぜこのテストが必要か
//! - 一つの接続への配信失敗が他の接続への配信を止めないことを保証
//! - 遅い受信者が上限時間で打ち切られることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員・呼び出し元・グループへの配信
//! - 異常系：チャンネルが閉じた接続、満杯のチャンネル、失敗を返すクライアント

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
    time::Duration,
};

use futures_util::future::join_all;

use crate::domain::{
    ConnectionId, ConnectionRegistry, DeliveryError, GroupName, MessageBody, UserName,
};

/// Default upper bound for a single recipient's send
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Logical recipient set of a broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Every live connection
    All,
    /// The invoking connection only
    Caller(ConnectionId),
    /// Members of a group
    Group(GroupName),
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Connections whose send channel accepted the call
    pub succeeded: BTreeSet<ConnectionId>,
    /// Connections that could not be reached, with the reason
    pub failed: BTreeMap<ConnectionId, DeliveryError>,
}

impl DeliveryReport {
    /// Number of resolved recipients
    pub fn recipient_count(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when every resolved recipient was reached
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Resolves recipient selectors and fans out `ReceiveMessage` calls
pub struct GroupBroadcaster {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// Upper bound for each recipient's send
    send_timeout: Duration,
}

impl GroupBroadcaster {
    /// 新しい GroupBroadcaster を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, send_timeout: Duration) -> Self {
        Self {
            registry,
            send_timeout,
        }
    }

    /// Resolve a selector to concrete connection ids.
    ///
    /// `Caller` resolves to the caller even if it is already gone; the
    /// delivery then records `ConnectionGone`.
    pub async fn resolve(&self, recipients: &Recipients) -> BTreeSet<ConnectionId> {
        match recipients {
            Recipients::All => self.registry.all().await,
            Recipients::Caller(id) => BTreeSet::from([id.clone()]),
            Recipients::Group(group) => self.registry.members_of(group).await,
        }
    }

    /// 受信者集合へメッセージを配信
    ///
    /// All sends run concurrently and each is bounded by the send timeout, so
    /// one slow or closed connection never holds up the others.
    ///
    /// # Returns
    ///
    /// A report of which recipients were reached and why the others failed
    pub async fn deliver(
        &self,
        recipients: &Recipients,
        user: &UserName,
        message: &MessageBody,
    ) -> DeliveryReport {
        let targets = self.resolve(recipients).await;

        let deliveries = targets.into_iter().map(|id| async move {
            let outcome = self.deliver_one(&id, user, message).await;
            (id, outcome)
        });

        let mut report = DeliveryReport::default();
        for (id, outcome) in join_all(deliveries).await {
            match outcome {
                Ok(()) => {
                    report.succeeded.insert(id);
                }
                Err(reason) => {
                    tracing::warn!("Failed to deliver message to connection '{}': {}", id, reason);
                    report.failed.insert(id, reason);
                }
            }
        }

        tracing::debug!(
            "Delivered message from '{}' to {:?}: {} succeeded, {} failed",
            user,
            recipients,
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    async fn deliver_one(
        &self,
        id: &ConnectionId,
        user: &UserName,
        message: &MessageBody,
    ) -> Result<(), DeliveryError> {
        let client = self
            .registry
            .client(id)
            .await
            .ok_or(DeliveryError::ConnectionGone)?;

        tokio::time::timeout(self.send_timeout, client.receive_message(user, message))
            .await
            .map_err(|_| DeliveryError::Timeout(self.send_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatClient, client::MockChatClient},
        infrastructure::{ChannelChatClient, InMemoryConnectionRegistry},
    };
    use tokio::sync::mpsc;

    fn connection_id(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn user(name: &str) -> UserName {
        UserName::new(name.to_string()).unwrap()
    }

    fn body(text: &str) -> MessageBody {
        MessageBody::new(text.to_string()).unwrap()
    }

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    async fn register_channel(
        registry: &InMemoryConnectionRegistry,
        id: &str,
        capacity: usize,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(capacity);
        registry
            .register(connection_id(id), Arc::new(ChannelChatClient::new(tx)))
            .await
            .unwrap();
        rx
    }

    fn create_broadcaster(registry: Arc<InMemoryConnectionRegistry>) -> GroupBroadcaster {
        GroupBroadcaster::new(registry, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_deliver_all_with_closed_channel() {
        // テスト項目: 3 接続中 1 接続のチャンネルが閉じていても、残り 2 接続には届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice_rx = register_channel(&registry, "alice", 8).await;
        let mut bob_rx = register_channel(&registry, "bob", 8).await;
        let charlie_rx = register_channel(&registry, "charlie", 8).await;
        drop(charlie_rx);
        let broadcaster = create_broadcaster(registry.clone());

        // when (操作):
        let report = broadcaster
            .deliver(&Recipients::All, &user("alice"), &body("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(
            report.failed.get(&connection_id("charlie")),
            Some(&DeliveryError::ChannelClosed)
        );
        assert!(!report.is_complete());
        assert!(alice_rx.recv().await.unwrap().contains("\"hi\""));
        assert!(bob_rx.recv().await.unwrap().contains("\"hi\""));
    }

    #[tokio::test]
    async fn test_deliver_caller_only() {
        // テスト項目: Caller は呼び出し元にだけ届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice_rx = register_channel(&registry, "alice", 8).await;
        let mut bob_rx = register_channel(&registry, "bob", 8).await;
        let broadcaster = create_broadcaster(registry.clone());

        // when (操作):
        let report = broadcaster
            .deliver(
                &Recipients::Caller(connection_id("alice")),
                &user("alice"),
                &body("just me"),
            )
            .await;

        // then (期待する結果):
        assert_eq!(report.succeeded, BTreeSet::from([connection_id("alice")]));
        assert!(alice_rx.recv().await.is_some());
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_deliver_caller_gone() {
        // テスト項目: 切断済みの呼び出し元への配信は ConnectionGone として記録される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let broadcaster = create_broadcaster(registry.clone());

        // when (操作):
        let report = broadcaster
            .deliver(
                &Recipients::Caller(connection_id("ghost")),
                &user("ghost"),
                &body("anyone?"),
            )
            .await;

        // then (期待する結果):
        assert!(report.succeeded.is_empty());
        assert_eq!(
            report.failed.get(&connection_id("ghost")),
            Some(&DeliveryError::ConnectionGone)
        );
    }

    #[tokio::test]
    async fn test_deliver_group_members_only() {
        // テスト項目: Group はメンバーにだけ届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut alice_rx = register_channel(&registry, "alice", 8).await;
        let mut bob_rx = register_channel(&registry, "bob", 8).await;
        registry
            .join_group(&connection_id("alice"), &group("red"))
            .await
            .unwrap();
        let broadcaster = create_broadcaster(registry.clone());

        // when (操作):
        let report = broadcaster
            .deliver(&Recipients::Group(group("red")), &user("bob"), &body("red!"))
            .await;

        // then (期待する結果):
        assert_eq!(report.recipient_count(), 1);
        assert!(report.is_complete());
        assert!(alice_rx.recv().await.is_some());
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_deliver_empty_group() {
        // テスト項目: 存在しないグループへの配信は空のレポートになる
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let broadcaster = create_broadcaster(registry);
        let report = broadcaster
            .deliver(&Recipients::Group(group("nobody")), &user("a"), &body("b"))
            .await;
        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn test_slow_recipient_times_out_without_blocking_others() {
        // テスト項目: 満杯のチャンネルはタイムアウトし、他の接続には届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let _slow_rx = register_channel(&registry, "slow", 1).await;
        let mut fast_rx = register_channel(&registry, "fast", 8).await;
        let broadcaster = create_broadcaster(registry.clone());
        // slow のチャンネルを埋める
        broadcaster
            .deliver(
                &Recipients::Caller(connection_id("slow")),
                &user("x"),
                &body("fill"),
            )
            .await;

        // when (操作):
        let report = broadcaster
            .deliver(&Recipients::All, &user("alice"), &body("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(report.succeeded, BTreeSet::from([connection_id("fast")]));
        assert_eq!(
            report.failed.get(&connection_id("slow")),
            Some(&DeliveryError::Timeout(Duration::from_millis(100)))
        );
        assert!(fast_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_failing_client_does_not_abort_fan_out() {
        // テスト項目: 失敗を返すクライアントがあっても、全ての受信者に一度ずつ呼び出しが行われる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());

        let mut failing = MockChatClient::new();
        failing
            .expect_receive_message()
            .times(1)
            .returning(|_, _| Err(DeliveryError::Encode("boom".to_string())));
        let mut healthy = MockChatClient::new();
        healthy
            .expect_receive_message()
            .withf(|user, message| user.as_str() == "alice" && message.as_str() == "hi")
            .times(1)
            .returning(|_, _| Ok(()));

        let failing: Arc<dyn ChatClient> = Arc::new(failing);
        let healthy: Arc<dyn ChatClient> = Arc::new(healthy);
        registry
            .register(connection_id("a-failing"), failing)
            .await
            .unwrap();
        registry
            .register(connection_id("b-healthy"), healthy)
            .await
            .unwrap();
        let broadcaster = create_broadcaster(registry.clone());

        // when (操作):
        let report = broadcaster
            .deliver(&Recipients::All, &user("alice"), &body("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(report.succeeded, BTreeSet::from([connection_id("b-healthy")]));
        assert_eq!(
            report.failed.get(&connection_id("a-failing")),
            Some(&DeliveryError::Encode("boom".to_string()))
        );
    }
}
