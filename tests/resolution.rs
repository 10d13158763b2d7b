//! Integration tests for memoized symbol resolution on a plain Spigot host.

mod common;

use std::sync::Arc;

use hostreflect::prelude::*;

fn spigot_resolver(server: &common::Server) -> SymbolResolver {
    let detector = HostVariantDetector::new();
    SymbolResolver::from_probe(
        &detector,
        &common::spigot_probe(),
        server.runtime.clone(),
        ResolverConfig::default(),
    )
}

#[test]
fn test_repeated_lookup_hits_cache() -> Result<()> {
    common::init_tracing();
    let server = common::spigot_server();
    let resolver = spigot_resolver(&server);
    assert!(resolver.remapper().is_none());

    let player = resolver.get_internal_type("EntityPlayer")?;
    let owner = player.type_ref().expect("EntityPlayer is defined");

    let before = server.runtime.stats().methods();
    let first = resolver.get_method(owner, "getName", &[]);
    let second = resolver.get_method(owner, "getName", &[]);

    assert!(first.is_found());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(server.runtime.stats().methods(), before + 1);

    let again = resolver.get_internal_type("EntityPlayer")?;
    assert!(Arc::ptr_eq(&player, &again));
    assert_eq!(server.runtime.stats().types(), 1);

    assert!(first.key().parameter_types().is_empty());
    assert_eq!(resolver.cached_counts().total(), 2);

    // the counters restart, the caches do not
    server.runtime.stats().reset();
    resolver.get_method(owner, "getName", &[]);
    assert_eq!(server.runtime.stats().total(), 0);
    Ok(())
}

#[test]
fn test_failed_lookup_is_memoized() -> Result<()> {
    let server = common::spigot_server();
    let resolver = spigot_resolver(&server);
    let owner = resolver
        .get_internal_type("EntityPlayer")?
        .type_ref()
        .cloned()
        .expect("EntityPlayer is defined");

    let first = resolver.get_method(&owner, "getDisplayName", &[]);
    assert!(!first.is_found());
    let lookups = server.runtime.stats().methods();

    let second = resolver.get_method(&owner, "getDisplayName", &[]);
    assert!(!second.is_found());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(server.runtime.stats().methods(), lookups);

    let field = resolver.get_field(&owner, "displayName");
    let field_again = resolver.get_field(&owner, "displayName");
    assert!(!field_again.is_found());
    assert!(Arc::ptr_eq(&field, &field_again));
    assert_eq!(server.runtime.stats().fields(), 1);

    let missing_type = resolver.get_internal_type("EntityHuman")?;
    assert!(!missing_type.is_found());
    resolver.get_internal_type("EntityHuman")?;
    assert_eq!(resolver.cached_counts().types, 2);
    Ok(())
}

#[test]
fn test_parameter_types_are_part_of_the_key() -> Result<()> {
    let server = common::spigot_server();
    let resolver = spigot_resolver(&server);
    let owner = resolver
        .get_internal_type("EntityPlayer")?
        .type_ref()
        .cloned()
        .expect("EntityPlayer is defined");

    let int_damage = resolver.get_method(&owner, "damage", &[TypeRef::new("int")]);
    let long_damage = resolver.get_method(&owner, "damage", &[TypeRef::new("long")]);
    assert!(int_damage.is_found());
    assert_eq!(int_damage.key().parameter_types(), &[TypeRef::new("int")]);
    assert!(!long_damage.is_found());

    // built from fresh TypeRefs, still the same key
    let int_again = resolver.get_method(&owner, "damage", &[TypeRef::new("int")]);
    assert!(Arc::ptr_eq(&int_damage, &int_again));
    assert_eq!(resolver.cached_counts().methods, 2);
    Ok(())
}

#[test]
fn test_probes_never_fail() -> Result<()> {
    let server = common::spigot_server();
    let resolver = spigot_resolver(&server);
    let owner = resolver
        .get_internal_type("EntityPlayer")?
        .type_ref()
        .cloned()
        .expect("EntityPlayer is defined");

    // Speculative probes for shapes of other server versions.
    for name in ["getProfile", "func_146103_bH", "getGameProfile"] {
        let handle = resolver.get_method(&owner, name, &[]);
        assert!(!handle.is_found());
        assert_eq!(resolver.invoke(&handle, &server.player, &[]), None);
    }

    let private_damage = resolver.get_method(&owner, "damage", &[TypeRef::new("int")]);
    let internal = resolver.invoke(
        &resolver.get_method(
            server.player.as_object().expect("player is an object").class(),
            "getHandle",
            &[],
        ),
        &server.player,
        &[],
    );
    let internal = internal.expect("getHandle returns the internal player");

    // private, made accessible by the resolver
    assert_eq!(
        resolver.invoke(&private_damage, &internal, &[HostValue::Int(3)]),
        Some(HostValue::Null)
    );
    // a failed call is not memoized
    let text = [HostValue::from("3")];
    assert_eq!(resolver.invoke(&private_damage, &internal, &text), None);
    assert!(resolver.try_invoke(&private_damage, Some(&internal), &text).is_err());
    assert!(resolver.invoke(&private_damage, &internal, &[HostValue::Int(4)]).is_some());

    assert_eq!(
        resolver.get_field_value_by_name(&internal, "ping"),
        Some(HostValue::Int(42))
    );
    assert_eq!(resolver.get_field_value_by_name(&internal, "health"), None);
    assert_eq!(resolver.get_field_value_by_name(&HostValue::Null, "ping"), None);
    Ok(())
}

#[test]
fn test_statics_and_construction() -> Result<()> {
    let server = common::spigot_server();
    let resolver = spigot_resolver(&server);

    let minecraft = resolver.get_internal_type("MinecraftServer")?;
    let minecraft = minecraft.type_ref().expect("MinecraftServer is defined");

    let version = resolver.get_method(minecraft, "getVersion", &[]);
    let reported = resolver.invoke_static(&version, &[]);
    assert_eq!(reported.as_ref().and_then(HostValue::as_str), Some("1.x"));

    let tick = resolver.get_field(minecraft, "currentTick");
    assert_eq!(resolver.get_field_value(&tick, None), Some(HostValue::Int(1200)));
    assert!(resolver.set_field_value(&tick, None, HostValue::Int(1201)));
    assert_eq!(resolver.try_get_field_value(&tick, None)?, HostValue::Int(1201));

    let chat = resolver.get_internal_type("PacketPlayOutChat")?;
    let chat = chat.type_ref().expect("PacketPlayOutChat is defined");
    let constructor = resolver.get_constructor(chat, &[TypeRef::new("java.lang.String")]);
    let packet = resolver.try_new_instance(&constructor, &[HostValue::from("hi")])?;
    assert_eq!(packet.type_name(), chat.name());
    assert_eq!(
        resolver.get_field_value_by_name(&packet, "message"),
        Some(HostValue::from("hi"))
    );

    let missing = resolver.get_constructor(chat, &[]);
    assert_eq!(resolver.new_instance(&missing, &[]), None);
    assert!(resolver.try_new_instance(&missing, &[]).unwrap_err().is_miss());
    Ok(())
}

#[test]
fn test_configuration_errors_surface() {
    let server = common::spigot_server();

    let unknown = SymbolResolver::direct(HostEnvironment::unknown(), server.runtime.clone());
    assert!(matches!(
        unknown.get_internal_type("EntityPlayer"),
        Err(Error::NoCapsule(HostVariant::Unknown))
    ));
    assert!(unknown.get_api_impl_type("CraftServer").unwrap_err().is_configuration());

    let sponge = SymbolResolver::direct(
        HostEnvironment::new(HostVariant::Sponge, None, None),
        server.runtime.clone(),
    );
    assert!(matches!(
        sponge.get_internal_type("EntityPlayer"),
        Err(Error::UnsupportedCapsule { .. })
    ));

    // plain type lookups need no capsule
    assert!(unknown
        .get_type("net.minecraft.server.v1_8_R3.EntityPlayer")
        .is_found());
}

#[test]
fn test_custom_package_roots() -> Result<()> {
    let server = common::spigot_server();
    let config = ResolverConfig {
        internal_package: "net.minecraft.server".to_string(),
        api_impl_package: "org.bukkit.craftbukkit".to_string(),
        ..ResolverConfig::default()
    };
    let environment = HostEnvironment::new(HostVariant::CraftBukkit, None, Some("v1_8_R3"));
    let resolver = SymbolResolver::for_host(environment, server.runtime.clone(), None, config);

    assert!(resolver.get_api_impl_type("entity.CraftPlayer")?.is_found());
    assert_eq!(resolver.environment().variant(), HostVariant::CraftBukkit);
    Ok(())
}
