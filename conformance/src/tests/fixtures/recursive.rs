//! A self-referencing class: the schema and both stylesheets handle it, the
//! extraction query refuses it.

/// Structure Model of people who know people.
pub const RECURSIVE: &str = r#"{
  "psmIri": "https://ex.org/psm/people",
  "owningSpecification": "https://ex.org/spec/people",
  "namespace": "https://ex.org/schema/people",
  "namespacePrefix": "pp",
  "roots": [["https://ex.org/psm/people/Person"]],
  "classes": [
    {
      "psmIri": "https://ex.org/psm/people/Person",
      "cimIri": "http://xmlns.com/foaf/0.1/Person",
      "technicalLabel": "Person",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/people/Person/name",
          "cimIri": "http://xmlns.com/foaf/0.1/name",
          "technicalLabel": "name",
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#string" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/people/Person/knows",
          "cimIri": "http://xmlns.com/foaf/0.1/knows",
          "technicalLabel": "knows",
          "cardinalityMin": 0,
          "cardinalityMax": null,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/people/Person" }
          ]
        }
      ]
    }
  ]
}"#;
