//! Shared fixtures for unit tests: complete in-memory hosts with a player, its connection
//! and a chat packet.

use std::sync::{Arc, Mutex};

use crate::{
    config::ResolverConfig,
    host::{HostEnvironment, HostVariant, Version},
    remap::{parse_srg, HostRemapper, TableRemapper},
    resolver::SymbolResolver,
    runtime::{HostObject, HostValue, MemoryRuntime, Modifiers, ObjectRef, TypeDef},
    Error,
};

/// Packets recorded by a connection's dispatch method.
#[derive(Default)]
pub struct Outbox(Mutex<Vec<HostValue>>);

impl Outbox {
    fn push(&self, packet: HostValue) {
        if let Ok(mut sent) = self.0.lock() {
            sent.push(packet);
        }
    }

    fn snapshot(&self) -> Vec<HostValue> {
        self.0.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

/// Names of the types and members making up a host's connection path.
struct Layout {
    api_player: &'static str,
    player: &'static str,
    connection: &'static str,
    packet: &'static str,
    chat: &'static str,
    connection_field: &'static str,
    dispatch_method: &'static str,
}

const SPIGOT_1_8: Layout = Layout {
    api_player: "org.bukkit.craftbukkit.v1_8_R3.entity.CraftPlayer",
    player: "net.minecraft.server.v1_8_R3.EntityPlayer",
    connection: "net.minecraft.server.v1_8_R3.PlayerConnection",
    packet: "net.minecraft.server.v1_8_R3.Packet",
    chat: "net.minecraft.server.v1_8_R3.PacketPlayOutChat",
    connection_field: "playerConnection",
    dispatch_method: "sendPacket",
};

const CAULDRON_1_7: Layout = Layout {
    api_player: "org.bukkit.craftbukkit.v1_7_R4.entity.CraftPlayer",
    player: "net.minecraft.entity.player.EntityPlayerMP",
    connection: "net.minecraft.network.NetHandlerPlayServer",
    packet: "net.minecraft.network.Packet",
    chat: "net.minecraft.network.play.server.S02PacketChat",
    connection_field: "field_71135_a",
    dispatch_method: "func_147359_a",
};

/// SRG mappings of the Cauldron fixture.
pub const CAULDRON_SRG: &str = "\
PK: net/minecraft/server/v1_7_R4 net/minecraft/server
CL: net/minecraft/server/v1_7_R4/EntityPlayer net/minecraft/entity/player/EntityPlayerMP
CL: net/minecraft/server/v1_7_R4/PlayerConnection net/minecraft/network/NetHandlerPlayServer
CL: net/minecraft/server/v1_7_R4/Packet net/minecraft/network/Packet
CL: net/minecraft/server/v1_7_R4/PacketPlayOutChat net/minecraft/network/play/server/S02PacketChat
FD: net/minecraft/server/v1_7_R4/EntityPlayer/playerConnection net/minecraft/entity/player/EntityPlayerMP/field_71135_a
MD: net/minecraft/server/v1_7_R4/PlayerConnection/sendPacket (Lnet/minecraft/server/v1_7_R4/Packet;)V net/minecraft/network/NetHandlerPlayServer/func_147359_a (Lnet/minecraft/network/Packet;)V
";

/// A host fixture.
pub struct TestHost {
    pub runtime: Arc<MemoryRuntime>,
    pub environment: HostEnvironment,
    pub remapper: Option<Arc<dyn HostRemapper>>,
    /// The API-level player
    pub player: HostValue,
    /// The internal connection of `player`
    pub connection: ObjectRef,
    chat_type: &'static str,
}

impl TestHost {
    /// A resolver for this host with the default configuration.
    pub fn resolver(&self) -> SymbolResolver {
        SymbolResolver::for_host(
            self.environment.clone(),
            self.runtime.clone(),
            self.remapper.clone(),
            ResolverConfig::default(),
        )
    }

    /// A chat packet, built without touching the runtime's lookup counters.
    pub fn chat(&self, message: &str) -> HostValue {
        HostObject::new(crate::runtime::TypeRef::new(self.chat_type))
            .with_field("message", message)
            .into()
    }

    /// Packets that reached the connection so far.
    pub fn sent(&self) -> Vec<HostValue> {
        self.connection
            .payload::<Outbox>()
            .map(Outbox::snapshot)
            .unwrap_or_default()
    }
}

fn build(layout: &Layout, environment: HostEnvironment) -> TestHost {
    let runtime = Arc::new(MemoryRuntime::new());

    runtime.define(TypeDef::new(layout.packet));
    runtime.define(
        TypeDef::new(layout.chat)
            .field("message", "java.lang.String", Modifiers::PRIVATE)
            .constructor(&["java.lang.String"], Modifiers::PUBLIC, |object, args| {
                Ok(object.with_field("message", args[0].clone()).into())
            }),
    );

    let dispatch_member = format!("{}.{}", layout.connection, layout.dispatch_method);
    let connection_type = runtime.define(TypeDef::new(layout.connection).method(
        layout.dispatch_method,
        &[layout.packet],
        "void",
        Modifiers::PUBLIC,
        move |receiver, args| {
            let outbox = receiver
                .and_then(HostValue::as_object)
                .and_then(|connection| connection.payload::<Outbox>())
                .ok_or_else(|| Error::Invocation {
                    member: dispatch_member.clone(),
                    message: "connection is closed".to_string(),
                })?;
            outbox.push(args[0].clone());
            Ok(HostValue::Null)
        },
    ));

    let player_type = runtime.define(
        TypeDef::new(layout.player)
            .field(layout.connection_field, layout.connection, Modifiers::PUBLIC)
            .field("ping", "int", Modifiers::PUBLIC),
    );

    let api_player_type = runtime.define(
        TypeDef::new(layout.api_player)
            .field("entity", layout.player, Modifiers::PROTECTED)
            .method("getHandle", &[], layout.player, Modifiers::PUBLIC, |receiver, _| {
                Ok(receiver
                    .and_then(HostValue::as_object)
                    .and_then(|player| player.field("entity"))
                    .unwrap_or(HostValue::Null))
            }),
    );

    let connection = Arc::new(HostObject::new(connection_type).with_payload(Outbox::default()));
    let internal_player = HostObject::new(player_type)
        .with_field(layout.connection_field, connection.clone())
        .with_field("ping", 35);
    let player = HostObject::new(api_player_type)
        .with_field("entity", internal_player)
        .into();

    TestHost {
        runtime,
        environment,
        remapper: None,
        player,
        connection,
        chat_type: layout.chat,
    }
}

/// A Spigot 1.8 server.
pub fn spigot_host() -> TestHost {
    build(
        &SPIGOT_1_8,
        HostEnvironment::new(
            HostVariant::Spigot,
            Some(Version::from_parts(&[1, 8])),
            Some("v1_8_R3"),
        ),
    )
}

/// A Cauldron 1.7.10 server with plugin remapping switched on.
pub fn cauldron_host() -> TestHost {
    let table = parse_srg(CAULDRON_SRG).expect("fixture mappings parse");
    let remapper: Arc<dyn HostRemapper> = Arc::new(TableRemapper::new(table));

    let mut host = build(
        &CAULDRON_1_7,
        HostEnvironment::new(
            HostVariant::Cauldron,
            Some(Version::from_parts(&[1, 7, 10])),
            Some("v1_7_R4"),
        )
        .with_remapper(remapper.clone()),
    );
    host.remapper = Some(remapper);
    host
}
