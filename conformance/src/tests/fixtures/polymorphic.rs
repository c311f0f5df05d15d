//! Polymorphism: a root group with two candidates, a choice with one root
//! candidate, and a choice without one.

/// Structure Model of a creative work with polymorphic creators.
pub const POLYMORPHIC: &str = r#"{
  "psmIri": "https://ex.org/psm/works",
  "owningSpecification": "https://ex.org/spec/works",
  "namespace": "https://ex.org/schema/works",
  "namespacePrefix": "w",
  "roots": [[
    "https://ex.org/psm/works/Book",
    "https://ex.org/psm/works/Film"
  ]],
  "classes": [
    {
      "psmIri": "https://ex.org/psm/works/Book",
      "cimIri": "https://schema.org/Book",
      "technicalLabel": "Book",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/works/Book/creator",
          "cimIri": "https://schema.org/creator",
          "technicalLabel": "creator",
          "cardinalityMin": 1,
          "cardinalityMax": null,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/works/Agent" },
            { "kind": "association", "class": "https://ex.org/psm/works/Person" },
            { "kind": "association", "class": "https://ex.org/psm/works/Organization" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/works/Book/about",
          "cimIri": "https://schema.org/about",
          "technicalLabel": "about",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/works/Place" },
            { "kind": "association", "class": "https://ex.org/psm/works/Event" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/works/Film",
      "cimIri": "https://schema.org/Movie",
      "technicalLabel": "Film",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/works/Film/name",
          "cimIri": "https://schema.org/name",
          "technicalLabel": "name",
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#string" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/works/Agent",
      "cimIri": "https://ex.org/vocab/Agent",
      "technicalLabel": "Agent",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/works/Agent/name",
          "cimIri": "https://schema.org/name",
          "technicalLabel": "name",
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#string" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/works/Person",
      "cimIri": "https://schema.org/Person",
      "technicalLabel": "Person",
      "extends": ["https://ex.org/psm/works/Agent"],
      "properties": [
        {
          "psmIri": "https://ex.org/psm/works/Person/birthDate",
          "cimIri": "https://schema.org/birthDate",
          "technicalLabel": "birthDate",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#date" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/works/Organization",
      "cimIri": "https://schema.org/Organization",
      "technicalLabel": "Organization",
      "extends": ["https://ex.org/psm/works/Agent"]
    },
    {
      "psmIri": "https://ex.org/psm/works/Place",
      "cimIri": "https://schema.org/Place",
      "technicalLabel": "Place"
    },
    {
      "psmIri": "https://ex.org/psm/works/Event",
      "cimIri": "https://schema.org/Event",
      "technicalLabel": "Event"
    }
  ]
}"#;
