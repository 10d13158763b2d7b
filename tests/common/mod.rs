//! Hosts shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use hostreflect::prelude::*;

/// Route `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Mappings shipped by the Cauldron server below.
pub const CAULDRON_SRG: &str = "\
# Cauldron 1.7.10 plugin mappings (excerpt)
PK: net/minecraft/server/v1_7_R4 net/minecraft/server
CL: net/minecraft/server/v1_7_R4/MinecraftServer net/minecraft/server/MinecraftServer
CL: net/minecraft/server/v1_7_R4/EntityPlayer net/minecraft/entity/player/EntityPlayerMP
CL: net/minecraft/server/v1_7_R4/PlayerConnection net/minecraft/network/NetHandlerPlayServer
CL: net/minecraft/server/v1_7_R4/Packet net/minecraft/network/Packet
CL: net/minecraft/server/v1_7_R4/PacketPlayOutChat net/minecraft/network/play/server/S02PacketChat
FD: net/minecraft/server/v1_7_R4/MinecraftServer/currentTick net/minecraft/server/MinecraftServer/field_71315_w
FD: net/minecraft/server/v1_7_R4/EntityPlayer/playerConnection net/minecraft/entity/player/EntityPlayerMP/field_71135_a
FD: net/minecraft/server/v1_7_R4/EntityPlayer/ping net/minecraft/entity/player/EntityPlayerMP/field_71138_i
MD: net/minecraft/server/v1_7_R4/EntityPlayer/getName ()Ljava/lang/String; net/minecraft/entity/player/EntityPlayerMP/func_70005_c_ ()Ljava/lang/String;
MD: net/minecraft/server/v1_7_R4/EntityPlayer/damage (I)V net/minecraft/entity/player/EntityPlayerMP/func_70097_a (I)V
MD: net/minecraft/server/v1_7_R4/PlayerConnection/sendPacket (Lnet/minecraft/server/v1_7_R4/Packet;)V net/minecraft/network/NetHandlerPlayServer/func_147359_a (Lnet/minecraft/network/Packet;)V
";

/// Live names of one server build.
struct Names {
    server: &'static str,
    current_tick: &'static str,
    api_player: &'static str,
    player: &'static str,
    get_name: &'static str,
    ping: &'static str,
    connection_field: &'static str,
    connection: &'static str,
    dispatch: &'static str,
    packet: &'static str,
    chat: &'static str,
}

/// A running server with one online player.
pub struct Server {
    pub runtime: Arc<MemoryRuntime>,
    pub player: HostValue,
    pub received: Arc<Mutex<Vec<HostValue>>>,
    pub chat_type: TypeRef,
}

impl Server {
    /// Packets the player's connection received.
    pub fn received(&self) -> Vec<HostValue> {
        self.received.lock().unwrap().clone()
    }
}

fn build(names: &Names) -> Server {
    let runtime = Arc::new(MemoryRuntime::new());
    let received = Arc::new(Mutex::new(Vec::new()));

    runtime.define(
        TypeDef::new(names.server)
            .static_field(names.current_tick, "int", Modifiers::PUBLIC, 1200)
            .method("getVersion", &[], "java.lang.String", Modifiers::PUBLIC | Modifiers::STATIC, |_, _| {
                Ok(HostValue::from("1.x"))
            }),
    );
    runtime.define(TypeDef::new(names.packet));
    let chat_type = runtime.define(
        TypeDef::new(names.chat)
            .field("message", "java.lang.String", Modifiers::PRIVATE)
            .constructor(&["java.lang.String"], Modifiers::PUBLIC, |object, args| {
                Ok(object.with_field("message", args[0].clone()).into())
            }),
    );

    let sink = received.clone();
    let connection_type = runtime.define(TypeDef::new(names.connection).method(
        names.dispatch,
        &[names.packet],
        "void",
        Modifiers::PUBLIC,
        move |_, args| {
            sink.lock().unwrap().push(args[0].clone());
            Ok(HostValue::Null)
        },
    ));

    let player_type = runtime.define(
        TypeDef::new(names.player)
            .field(names.connection_field, names.connection, Modifiers::PUBLIC)
            .field(names.ping, "int", Modifiers::PUBLIC)
            .method(names.get_name, &[], "java.lang.String", Modifiers::PUBLIC, |_, _| {
                Ok(HostValue::from("Notch"))
            })
            // an unrelated overload sharing the mapped damage name
            .method("func_70097_a", &["long"], "void", Modifiers::PUBLIC, |_, _| Ok(HostValue::Null))
            .method("damage", &["int"], "void", Modifiers::PRIVATE, |_, _| Ok(HostValue::Null)),
    );

    let api_player_type = runtime.define(
        TypeDef::new(names.api_player)
            .field("entity", names.player, Modifiers::PROTECTED)
            .method("getHandle", &[], names.player, Modifiers::PUBLIC, |receiver, _| {
                Ok(receiver
                    .and_then(HostValue::as_object)
                    .and_then(|player| player.field("entity"))
                    .unwrap_or(HostValue::Null))
            }),
    );

    let connection = HostObject::new(connection_type);
    let internal = HostObject::new(player_type)
        .with_field(names.connection_field, connection)
        .with_field(names.ping, 42);
    let player = HostObject::new(api_player_type)
        .with_field("entity", internal)
        .into();

    Server {
        runtime,
        player,
        received,
        chat_type,
    }
}

/// A Spigot 1.8.8 server.
pub fn spigot_server() -> Server {
    build(&Names {
        server: "net.minecraft.server.v1_8_R3.MinecraftServer",
        current_tick: "currentTick",
        api_player: "org.bukkit.craftbukkit.v1_8_R3.entity.CraftPlayer",
        player: "net.minecraft.server.v1_8_R3.EntityPlayer",
        get_name: "getName",
        ping: "ping",
        connection_field: "playerConnection",
        connection: "net.minecraft.server.v1_8_R3.PlayerConnection",
        dispatch: "sendPacket",
        packet: "net.minecraft.server.v1_8_R3.Packet",
        chat: "net.minecraft.server.v1_8_R3.PacketPlayOutChat",
    })
}

/// A Cauldron 1.7.10 server running deobfuscated names.
pub fn cauldron_server() -> Server {
    build(&Names {
        server: "net.minecraft.server.MinecraftServer",
        current_tick: "field_71315_w",
        api_player: "org.bukkit.craftbukkit.v1_7_R4.entity.CraftPlayer",
        player: "net.minecraft.entity.player.EntityPlayerMP",
        get_name: "func_70005_c_",
        ping: "field_71138_i",
        connection_field: "field_71135_a",
        connection: "net.minecraft.network.NetHandlerPlayServer",
        dispatch: "func_147359_a",
        packet: "net.minecraft.network.Packet",
        chat: "net.minecraft.network.play.server.S02PacketChat",
    })
}

/// Probe of the Spigot server.
pub fn spigot_probe() -> StaticProbe {
    StaticProbe::new("git-Spigot-1234 (MC: 1.8)").with_package("org.bukkit.craftbukkit.v1_8_R3")
}

/// Probe of the Cauldron server, remapping switched on.
pub fn cauldron_probe() -> Result<StaticProbe> {
    let remapper = TableRemapper::new(parse_srg(CAULDRON_SRG)?);
    Ok(
        StaticProbe::new("git-Cauldron-MCPC-Plus-1.7.10-1.1614.58 (MC: 1.7.10)")
            .with_package("org.bukkit.craftbukkit.v1_7_R4")
            .with_remapper(Arc::new(remapper)),
    )
}
