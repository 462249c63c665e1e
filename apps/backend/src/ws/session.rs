use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::domain::{DomainError, PreconditionKind};
use crate::errors::ErrorCode;
use crate::protocol::{ClientMsg, ServerMsg};
use crate::services::notifier::ConnId;
use crate::services::room::Membership;
use crate::services::RoomService;
use crate::state::app_state::AppState;
use crate::ws::hub::{ConnectionHub, Outbound};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(
        Uuid::new_v4(),
        app_state.rooms.clone(),
        app_state.hub.clone(),
    );
    ws::start(session, &req, stream)
}

/// One client connection. It acts for at most one participant at a time.
pub struct WsSession {
    conn_id: ConnId,
    rooms: RoomService,
    hub: Arc<ConnectionHub>,
    membership: Option<Membership>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(conn_id: ConnId, rooms: RoomService, hub: Arc<ConnectionHub>) -> Self {
        Self {
            conn_id,
            rooms,
            hub,
            membership: None,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn current_room(&self) -> Result<Membership, AppError> {
        self.membership.clone().ok_or_else(|| {
            DomainError::precondition(PreconditionKind::NotInRoom, "join a room first").into()
        })
    }

    fn require_no_room(&self) -> Result<(), AppError> {
        match &self.membership {
            Some(m) => Err(DomainError::precondition(
                PreconditionKind::AlreadyInRoom,
                format!("already in room {}", m.room_id),
            )
            .into()),
            None => Ok(()),
        }
    }

    fn handle_command(
        &mut self,
        cmd: ClientMsg,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Result<(), AppError> {
        match cmd {
            ClientMsg::CreateRoom => {
                let room_id = self.rooms.create_room();
                Self::send_json(ctx, &ServerMsg::RoomCreated { room_id });
            }
            ClientMsg::JoinRoom { room_id, name } => {
                self.require_no_room()?;
                let membership = self.rooms.join_room(self.conn_id, &room_id, &name)?;
                self.membership = Some(membership);
            }
            ClientMsg::AttemptReconnect { room_id, token } => {
                self.require_no_room()?;
                match self.rooms.reconnect(self.conn_id, &room_id, token) {
                    Ok(membership) => self.membership = Some(membership),
                    Err(err) => {
                        debug!(conn_id = %self.conn_id, error = %err, "[WS SESSION] reconnect refused");
                        Self::send_json(
                            ctx,
                            &ServerMsg::ReconnectFailed {
                                reason: err.detail(),
                            },
                        );
                    }
                }
            }
            ClientMsg::LeaveRoom => {
                let membership = self.current_room()?;
                self.rooms.leave_room(self.conn_id, &membership)?;
                self.membership = None;
                Self::send_json(ctx, &ServerMsg::RoomLeft);
            }
            ClientMsg::StartGame => self.rooms.start_game(&self.current_room()?)?,
            ClientMsg::ProposeTeam { team } => {
                self.rooms.propose_team(&self.current_room()?, &team)?
            }
            ClientMsg::VoteTeam { vote } => self.rooms.vote_team(&self.current_room()?, vote)?,
            ClientMsg::VoteMission { vote } => {
                self.rooms.vote_mission(&self.current_room()?, vote)?
            }
            ClientMsg::UseLadyOfTheLake { target } => {
                self.rooms.use_lady(&self.current_room()?, target)?
            }
            ClientMsg::Assassinate { target } => {
                self.rooms.assassinate(&self.current_room()?, target)?
            }
            ClientMsg::CloseRoom => self.rooms.close_room(&self.current_room()?)?,
            ClientMsg::ForceEnd => self.rooms.force_end(&self.current_room()?)?,
        }
        Ok(())
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.hub.register_connection(
            self.conn_id,
            ctx.address().recipient::<Outbound>(),
            ctx.address().recipient::<Shutdown>(),
        );
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(membership) = self.membership.take() {
            self.rooms.disconnect(self.conn_id, &membership);
        }
        self.hub.unregister_connection(self.conn_id);
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let cmd = match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => cmd,
                    Err(err) => {
                        Self::send_json(ctx, &AppError::from(err).to_server_msg());
                        return;
                    }
                };

                let kind = cmd.kind();
                if let Err(err) = self.handle_command(cmd, ctx) {
                    debug!(
                        conn_id = %self.conn_id,
                        command = kind,
                        code = %err.code(),
                        "[WS SESSION] command failed"
                    );
                    Self::send_json(ctx, &err.to_server_msg());
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        let Outbound(msg) = msg;
        let closes_current = match (msg.closed_room(), &self.membership) {
            (Some(closed), Some(current)) => closed == current.room_id,
            _ => false,
        };
        if closes_current {
            self.membership = None;
        }
        Self::send_json(ctx, &msg);
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}
