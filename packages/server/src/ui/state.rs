//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{
        ConnectionRegistry, IdentityVerifier, MessagePusher, MessageRepository, RoomRepository,
    },
    usecase::{
        AuthenticateUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetMessagesUseCase, ManageRoomUseCase, MarkMessageReadUseCase, RoomAnnouncer,
        RoomPresenceUseCase, SendMessageUseCase,
    },
};

/// Usecases shared by every handler and live session
pub struct AppState {
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    pub mark_message_read_usecase: Arc<MarkMessageReadUseCase>,
    pub room_presence_usecase: Arc<RoomPresenceUseCase>,
    pub manage_room_usecase: Arc<ManageRoomUseCase>,
    /// Close live connections that stay silent this long (`None` = never)
    pub idle_timeout: Option<Duration>,
}

impl AppState {
    /// Wire every usecase against the given collaborators.
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        messages: Arc<dyn MessageRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        identity: Arc<dyn IdentityVerifier>,
    ) -> Self {
        let announcer = Arc::new(RoomAnnouncer::new(registry.clone(), message_pusher));
        Self {
            authenticate_usecase: Arc::new(AuthenticateUseCase::new(identity.clone())),
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                identity,
                rooms.clone(),
                announcer.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                announcer.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                rooms.clone(),
                messages.clone(),
                announcer.clone(),
            )),
            get_messages_usecase: Arc::new(GetMessagesUseCase::new(
                rooms.clone(),
                messages.clone(),
            )),
            mark_message_read_usecase: Arc::new(MarkMessageReadUseCase::new(
                rooms.clone(),
                messages.clone(),
                announcer.clone(),
            )),
            room_presence_usecase: Arc::new(RoomPresenceUseCase::new(
                rooms.clone(),
                registry,
                announcer,
            )),
            manage_room_usecase: Arc::new(ManageRoomUseCase::new(rooms, messages)),
            idle_timeout: None,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }
}
