//! Initial catalog content.

use glossary_sdk::Term;

/// Highest id used by [`seed_terms`]; new ids start right after it.
pub const SEED_MAX_ID: u64 = 5;

struct SeedEntry {
    name: &'static str,
    definition: &'static str,
    category: &'static str,
    examples: &'static [&'static str],
    synonyms: &'static [&'static str],
}

const SEED: [SeedEntry; 5] = [
    SeedEntry {
        name: "Protobuf",
        definition: "Language-neutral mechanism for serializing structured data, developed by \
                     Google for compact and efficient data exchange between services.",
        category: "Data Serialization",
        examples: &["gRPC message definitions", "Configuration files"],
        synonyms: &["Protocol Buffers", "protobuf"],
    },
    SeedEntry {
        name: "gRPC",
        definition: "High-performance framework for remote procedure calls built on HTTP/2 \
                     and Protocol Buffers.",
        category: "RPC Framework",
        examples: &["Communication between microservices", "Mobile backends"],
        synonyms: &["Google RPC", "gRPC Remote Procedure Calls"],
    },
    SeedEntry {
        name: "Docker",
        definition: "Platform for building, shipping and running applications in isolated \
                     containers.",
        category: "Containerization",
        examples: &["Packaging a web application", "Reproducible CI environments"],
        synonyms: &["Containers", "Docker Engine"],
    },
    SeedEntry {
        name: "REST",
        definition: "Architectural style for distributed systems that exposes resources over \
                     HTTP using standard methods.",
        category: "API Design",
        examples: &["Public web APIs", "CRUD services"],
        synonyms: &["RESTful API", "Representational State Transfer"],
    },
    SeedEntry {
        name: "Streaming",
        definition: "Transferring data as a continuous sequence of messages instead of a \
                     single response.",
        category: "Data Transfer",
        examples: &["Server-sent events", "Live log tailing"],
        synonyms: &["Data streaming", "Real-time transfer"],
    },
];

/// The seed catalog with ids `1..=SEED_MAX_ID`, stamped with `now`.
pub fn seed_terms(now: &str) -> Vec<Term> {
    SEED.iter()
        .zip(1u64..)
        .map(|(entry, id)| Term {
            id: id.to_string(),
            name: entry.name.to_owned(),
            definition: entry.definition.to_owned(),
            category: entry.category.to_owned(),
            examples: entry.examples.iter().map(|s| (*s).to_owned()).collect(),
            synonyms: entry.synonyms.iter().map(|s| (*s).to_owned()).collect(),
            created_at: now.to_owned(),
            updated_at: now.to_owned(),
        })
        .collect()
}
