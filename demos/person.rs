//! Declare a few shapes, construct records, print their mapping views.
//!
//! Run with: `cargo run --example person`

use anyhow::Result;
use schemap::{Kind, Property, Schema, schema};
use serde_json::json;

schema! {
    /// A person with nested address and hobby records.
    static PERSON: "Person" {
        name: Property::string(),
        age: Property::integer(),
        comments: Property::string_array(),
        hobbies: Property::array_of(Kind::Nested(HOBBY.clone())),
        address: Property::nested(ADDRESS.clone()),
        try_default: Property::string().with_default(json!("this is default")),
        rating: Property::float(),
    }
}

schema! {
    static ADDRESS: "Address" {
        addr: Property::string(),
        country: Property::string(),
    }
}

schema! {
    static HOBBY: "Hobby" {
        name: Property::string(),
        years: Property::integer(),
    }
}

fn main() -> Result<()> {
    let address = ADDRESS.record_from_value(json!({
        "addr": "1-2-3",
        "country": "Japan",
    }))?;
    let music = HOBBY.record_from_value(json!({"name": "Music", "years": 20}))?;
    let cycling = HOBBY.record_from_value(json!({"name": "Cycling", "years": 3}))?;

    let person = PERSON.record_from_value(json!({
        "name": "George",
        "age": 25,
        "comments": ["hello", "goodbye"],
        "hobbies": [music, cycling],
        "address": address,
    }))?;
    println!("{}", serde_json::to_string_pretty(&person)?);

    // A field marked rewritable stays writable after the record locks.
    let rewritable = Schema::builder("Rewritable")
        .field("rewritable_field", Property::string().rewritable())
        .build()?;
    let mut rec = rewritable.record_from_value(json!({"rewritable_field": "one"}))?;
    rec.set("rewritable_field", json!("two"))?;
    println!("{}", serde_json::to_string_pretty(&rec)?);

    // Defaults fill everything the input leaves out.
    let with_default = Schema::builder("DefaultValue")
        .field(
            "message",
            Property::string().with_default(json!("please enter a message")),
        )
        .build()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&with_default.record_default()?)?
    );
    println!(
        "{}",
        serde_json::to_string_pretty(
            &with_default.record_from_value(json!({"message": "here is message"}))?
        )?
    );

    Ok(())
}
