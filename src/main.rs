use field_buffer::field_id::make_id;
use field_buffer::{BufferPool, FieldRepository, FieldType, FieldValue, PoolConfig, stream};
use tracing_subscriber::EnvFilter;

const DEMO_TABLE: &str = r#"{
  "groups": [
    { "base": 1000,
      "fields": [
        { "id": 1, "name": "CUSTOMER_NAME", "type": "string" },
        { "id": 2, "name": "CUSTOMER_AGE", "type": "short" },
        { "id": 3, "name": "CUSTOMER_SCORE", "type": "double" },
        { "id": 4, "name": "CUSTOMER_AVATAR", "type": "binary" }
      ] }
  ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Optional arguments: field table path, pool config path.
    let mut args = std::env::args().skip(1);
    let repository = match args.next() {
        Some(path) => FieldRepository::load(path)?,
        None => FieldRepository::from_json_str(DEMO_TABLE)?,
    };
    let config = match args.next() {
        Some(path) => PoolConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => PoolConfig {
            default_capacity: 64,
            ..PoolConfig::default()
        },
    };

    let name = repository
        .name_to_id("CUSTOMER_NAME")
        .unwrap_or(make_id(FieldType::String, 1001));
    let age = repository
        .name_to_id("CUSTOMER_AGE")
        .unwrap_or(make_id(FieldType::Short, 1002));
    let score = repository
        .name_to_id("CUSTOMER_SCORE")
        .unwrap_or(make_id(FieldType::Double, 1003));

    let mut pool = BufferPool::new_with_config(config);
    let mut handle = pool.allocate(None)?;
    for (id, value) in [
        (name, FieldValue::String("Alice")),
        (age, FieldValue::Short(30)),
        (name, FieldValue::String("Bob")),
        (score, FieldValue::Double(99.5)),
    ] {
        handle = pool.add_growing(handle, id, &value)?;
    }
    pool.get_mut(handle)?.update_string(name, 0, "Alice Liddell")?;

    let buffer = pool.get(handle)?;
    print!("{}", stream::to_text(buffer, Some(&repository))?);
    println!("{}", serde_json::to_string_pretty(&stream::to_json(buffer, Some(&repository))?)?);
    let usage = buffer.explore();
    tracing::info!(reserved = usage.reserved, utilized = usage.utilized, "done");

    pool.release(handle)?;
    Ok(())
}
