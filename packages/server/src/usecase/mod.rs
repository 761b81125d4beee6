//! UseCase 層
//!
//! ハブの振る舞いを実装するレイヤー。
//! UI 層（トランスポートアダプタ）から呼び出され、Domain 層を操作します。

pub mod broadcast;
pub mod error;
pub mod hub;

pub use broadcast::{DEFAULT_SEND_TIMEOUT, DeliveryReport, GroupBroadcaster, Recipients};
pub use error::HubError;
pub use hub::ChatHub;
