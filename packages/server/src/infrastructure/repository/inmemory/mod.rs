//! InMemory Repository 実装
//!
//! HashMap をインメモリ DB として使用します。プロセス再起動で内容は失われます。

mod message;
mod room;

pub use message::InMemoryMessageRepository;
pub use room::InMemoryRoomRepository;
