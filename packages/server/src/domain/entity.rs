//! Domain entities.

use std::collections::BTreeSet;

use serde::Serialize;

use super::value_object::{MessageContent, MessageId, RoomId, RoomTitle, Timestamp, UserId};

/// Chat room with its membership set
///
/// Membership is the source of truth for authorization. A room is deactivated
/// when its membership becomes empty and reactivated when someone joins again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub title: RoomTitle,
    pub is_active: bool,
    pub members: BTreeSet<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Room {
    /// Create an active room; it is deactivated right away when `members` is empty
    pub fn new(
        id: RoomId,
        title: RoomTitle,
        members: impl IntoIterator<Item = UserId>,
        created_at: Timestamp,
    ) -> Self {
        let members: BTreeSet<UserId> = members.into_iter().collect();
        Self {
            id,
            title,
            is_active: !members.is_empty(),
            members,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }

    /// Add a member. Returns `false` if the user already was one.
    pub fn add_member(&mut self, user_id: UserId, now: Timestamp) -> bool {
        let inserted = self.members.insert(user_id);
        if inserted {
            self.is_active = true;
            self.updated_at = now;
        }
        inserted
    }

    /// Remove a member. Returns `false` if the user was not one.
    pub fn remove_member(&mut self, user_id: &UserId, now: Timestamp) -> bool {
        let removed = self.members.remove(user_id);
        if removed {
            self.updated_at = now;
            if self.members.is_empty() {
                self.is_active = false;
            }
        }
        removed
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Persisted chat message, immutable except for the read flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
    pub is_read: bool,
}

/// Optional narrowing of a message listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub sender_id: Option<UserId>,
    pub unread_only: bool,
}

impl MessageFilter {
    pub fn matches(&self, message: &Message) -> bool {
        if self.unread_only && message.is_read {
            return false;
        }
        match &self.sender_id {
            Some(sender_id) => &message.sender_id == sender_id,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn create_test_room(members: &[&str]) -> Room {
        Room::new(
            RoomId::new("r1".to_string()).unwrap(),
            RoomTitle::new("Lobby".to_string()).unwrap(),
            members.iter().map(|m| user(m)),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_new_room_without_members_is_inactive() {
        // テスト項目: メンバーなしで作成したルームは非アクティブになる
        // given (前提条件):
        let members: [&str; 0] = [];

        // when (操作):
        let room = create_test_room(&members);

        // then (期待する結果):
        assert!(!room.is_active);
        assert_eq!(room.member_count(), 0);
    }

    #[test]
    fn test_duplicate_members_are_collapsed() {
        // テスト項目: 重複したメンバーは一人として扱われる
        // given (前提条件):
        let members = ["alice", "alice", "bob"];

        // when (操作):
        let room = create_test_room(&members);

        // then (期待する結果):
        assert_eq!(room.member_count(), 2);
        assert!(room.is_active);
    }

    #[test]
    fn test_removing_last_member_deactivates_room() {
        // テスト項目: 最後のメンバーが抜けるとルームが非アクティブになる
        // given (前提条件):
        let mut room = create_test_room(&["alice"]);

        // when (操作):
        let removed = room.remove_member(&user("alice"), Timestamp::new(2000));

        // then (期待する結果):
        assert!(removed);
        assert!(!room.is_active);
        assert_eq!(room.updated_at, Timestamp::new(2000));
    }

    #[test]
    fn test_adding_member_reactivates_room() {
        // テスト項目: 非アクティブなルームにメンバーが加わると再びアクティブになる
        // given (前提条件):
        let mut room = create_test_room(&[]);

        // when (操作):
        let added = room.add_member(user("bob"), Timestamp::new(3000));
        let added_again = room.add_member(user("bob"), Timestamp::new(4000));

        // then (期待する結果):
        assert!(added);
        assert!(!added_again);
        assert!(room.is_active);
        assert_eq!(room.updated_at, Timestamp::new(3000));
    }

    #[test]
    fn test_message_filter_matches_sender_and_unread() {
        // テスト項目: MessageFilter が送信者と未読状態で絞り込む
        // given (前提条件):
        let mut message = Message {
            id: MessageId::generate(),
            room_id: RoomId::new("r1".to_string()).unwrap(),
            sender_id: user("alice"),
            content: MessageContent::new("hello".to_string()).unwrap(),
            created_at: Timestamp::new(1000),
            is_read: false,
        };
        let by_alice = MessageFilter {
            sender_id: Some(user("alice")),
            unread_only: true,
        };
        let by_bob = MessageFilter {
            sender_id: Some(user("bob")),
            unread_only: false,
        };

        // when (操作):
        let before_read = by_alice.matches(&message);
        message.is_read = true;
        let after_read = by_alice.matches(&message);

        // then (期待する結果):
        assert!(before_read);
        assert!(!after_read);
        assert!(!by_bob.matches(&message));
        assert!(MessageFilter::default().matches(&message));
    }
}
