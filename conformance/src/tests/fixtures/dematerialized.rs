//! Dematerialized content and reverse properties.

/// Structure Model of an event whose period is spliced into it.
pub const DEMATERIALIZED: &str = r#"{
  "psmIri": "https://ex.org/psm/events",
  "owningSpecification": "https://ex.org/spec/events",
  "roots": [["https://ex.org/psm/events/Event"]],
  "classes": [
    {
      "psmIri": "https://ex.org/psm/events/Event",
      "cimIri": "https://schema.org/Event",
      "technicalLabel": "Event",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/events/Event/period",
          "cimIri": "https://ex.org/vocab/period",
          "technicalLabel": "period",
          "dematerialize": true,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/events/Period" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/events/Event/organizer",
          "cimIri": "https://ex.org/vocab/organizes",
          "technicalLabel": "organizer",
          "cardinalityMin": 0,
          "cardinalityMax": null,
          "isReverse": true,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/events/Organizer" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/events/Period",
      "cimIri": "https://ex.org/vocab/Period",
      "technicalLabel": "Period",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/events/Period/start",
          "cimIri": "https://ex.org/vocab/start",
          "technicalLabel": "start",
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#dateTime" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/events/Period/end",
          "cimIri": "https://ex.org/vocab/end",
          "technicalLabel": "end",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#dateTime" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/events/Organizer",
      "cimIri": "https://schema.org/Organization",
      "technicalLabel": "Organizer",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/events/Organizer/name",
          "cimIri": "https://schema.org/name",
          "technicalLabel": "name",
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString" }
          ]
        }
      ]
    }
  ]
}"#;
