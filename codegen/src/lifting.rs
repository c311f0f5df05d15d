//! XSLT lifting generator: XML documents valid against the generated schema
//! are transformed into RDF/XML.
//!
//! Each class gets a named template producing one `rdf:Description`; each
//! root candidate gets a rule matching the document element. Dematerialized
//! content is lifted from the element that carries it, as a separate blank
//! node whose id extends the parent's with the property name.

use structura_model::iris::{RDF, RDF_LANG_STRING, XSLT_NS};
use structura_model::{Class, GeneratorKind, Property, StructureModel};

use crate::emit::XmlWriter;
use crate::error::{GenerationError, Result};
use crate::graph;
use crate::imports::{ImportResolution, ImportResolver, ImportTable};
use crate::mapping::{template_name, to_ncname};
use crate::namespaces::PrefixTable;
use crate::types::{ChoiceBase, Primitive, ResolvedShape, TypeResolver};
use crate::GenerationInput;

/// Helper template writing `rdf:about`, `rdf:resource` or `rdf:nodeID`.
const NODE_TEMPLATE: &str = "lift-node";

/// Prefix bound to the target namespace when the model declares none.
const DEFAULT_TARGET_PREFIX: &str = "tns";

/// Generates the lifting stylesheet of a model.
///
/// # Errors
///
/// Returns a [`GenerationError`] if the model is malformed, uses several
/// primitive types on one property, has a predicate that cannot be an RDF/XML
/// element name, or references a foreign class no sibling stylesheet covers.
pub fn generate(input: &GenerationInput<'_>) -> Result<String> {
    let resolver = TypeResolver::new(input.model);
    graph::check_dematerialization(&resolver)?;
    let target_prefix = input.model.namespace.as_ref().map(|_| {
        input
            .model
            .namespace_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET_PREFIX.to_string())
    });
    let mut predicates = PrefixTable::new("ns");
    let mut reserved = vec!["xsl", "rdf"];
    if let Some(prefix) = &target_prefix {
        predicates = predicates.reserving(prefix);
        reserved.push(prefix.as_str());
    }
    let mut builder = LiftingBuilder {
        model: input.model,
        resolver,
        imports: input.import_resolver(GeneratorKind::XsltLifting),
        import_table: ImportTable::new(&reserved),
        predicates,
        target_prefix,
    };
    builder.build()
}

struct LiftingBuilder<'a> {
    model: &'a StructureModel,
    resolver: TypeResolver<'a>,
    imports: ImportResolver<'a>,
    import_table: ImportTable,
    predicates: PrefixTable,
    target_prefix: Option<String>,
}

impl<'a> LiftingBuilder<'a> {
    fn build(&mut self) -> Result<String> {
        let model = self.model;
        let mut body = XmlWriter::with_depth(1);
        let mut templates = 0;
        for class in self.resolver.root_classes()? {
            self.root_rule(&mut body, class)?;
        }
        for class in &model.classes {
            if model.is_foreign(class) || class.is_codelist {
                continue;
            }
            self.class_template(&mut body, class)?;
            templates += 1;
        }
        Self::node_template(&mut body);
        Self::identity_template(&mut body);
        log::debug!("lifting: {templates} class templates");
        Ok(self.assemble(&body.finish()))
    }

    fn assemble(&self, body: &str) -> String {
        let mut attrs: Vec<(String, String)> = vec![
            ("version".into(), "2.0".into()),
            ("xmlns:xsl".into(), XSLT_NS.into()),
            ("xmlns:rdf".into(), RDF.into()),
        ];
        if let (Some(prefix), Some(namespace)) = (&self.target_prefix, &self.model.namespace) {
            attrs.push((format!("xmlns:{prefix}"), namespace.clone()));
            attrs.push(("exclude-result-prefixes".into(), prefix.clone()));
        }
        for (prefix, namespace) in self.predicates.iter() {
            attrs.push((format!("xmlns:{prefix}"), namespace.to_string()));
        }
        let attrs: Vec<(&str, &str)> = attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let mut w = XmlWriter::new();
        w.declaration();
        w.start("xsl:stylesheet", &attrs);
        for entry in self.import_table.entries() {
            w.empty("xsl:import", &[("href", entry.descriptor.reference.as_str())]);
        }
        w.empty(
            "xsl:output",
            &[
                ("method", "xml"),
                ("version", "1.0"),
                ("encoding", "utf-8"),
                ("indent", "yes"),
            ],
        );
        w.raw(body);
        w.finish()
    }

    fn root_rule(&mut self, w: &mut XmlWriter, class: &'a Class) -> Result<()> {
        let element = to_ncname(&class.technical_label);
        let pattern = match &self.target_prefix {
            Some(prefix) => format!("/{prefix}:{element}"),
            None => format!("/{element}"),
        };
        w.start("xsl:template", &[("match", pattern.as_str())]);
        w.start("rdf:RDF", &[]);
        self.call_class(w, class, None)?;
        w.end();
        w.end();
        Ok(())
    }

    /// Calls the template of a class, importing it if the class is foreign.
    fn call_class(&mut self, w: &mut XmlWriter, class: &Class, suffix: Option<&str>) -> Result<()> {
        if let ImportResolution::Import(descriptor) = self.imports.resolve(class)? {
            self.import_table.register(descriptor);
        }
        let name = template_name(&class.psm_iri);
        match suffix {
            None => w.empty("xsl:call-template", &[("name", name.as_str())]),
            Some(suffix) => {
                w.start("xsl:call-template", &[("name", name.as_str())]);
                w.empty("xsl:with-param", &[("name", "suffix"), ("select", suffix)]);
                w.end();
            }
        }
        Ok(())
    }

    /// Writes the node attribute of the context element.
    fn node(w: &mut XmlWriter, reference: bool, suffix: &str) {
        w.start("xsl:call-template", &[("name", NODE_TEMPLATE)]);
        if reference {
            w.empty("xsl:with-param", &[("name", "reference"), ("select", "true()")]);
        }
        w.empty("xsl:with-param", &[("name", "suffix"), ("select", suffix)]);
        w.end();
    }

    fn predicate(&mut self, property: &Property) -> Result<String> {
        self.predicates
            .qualify(&property.cim_iri)
            .ok_or_else(|| GenerationError::UnserializablePredicate {
                property: property.psm_iri.clone(),
                iri: property.cim_iri.clone(),
            })
    }

    /// Returns a test for the presence of any element spliced from `class`.
    fn presence_test(&self, class: &'a Class) -> Result<Option<String>> {
        let mut names = Vec::new();
        self.spliced_names(class, &mut names)?;
        Ok((!names.is_empty()).then(|| names.join(" or ")))
    }

    fn spliced_names(&self, class: &'a Class, names: &mut Vec<String>) -> Result<()> {
        for property in self.resolver.effective_properties(class)? {
            if property.dematerialize {
                let target = graph::dematerialized_target(&self.resolver, property)?;
                self.spliced_names(target, names)?;
            } else {
                names.push(to_ncname(&property.technical_label));
            }
        }
        Ok(())
    }

    fn class_template(&mut self, w: &mut XmlWriter, class: &'a Class) -> Result<()> {
        let name = template_name(&class.psm_iri);
        w.start("xsl:template", &[("name", name.as_str())]);
        w.empty("xsl:param", &[("name", "suffix"), ("select", "''")]);
        w.start("rdf:Description", &[]);
        Self::node(w, false, "$suffix");
        if let Some(cim) = &class.cim_iri {
            w.empty("rdf:type", &[("rdf:resource", cim.as_str())]);
        }
        let properties = self.resolver.effective_properties(class)?;
        for &property in &properties {
            self.forward_triples(w, property)?;
        }
        w.end();
        for &property in &properties {
            self.related_nodes(w, property)?;
        }
        w.end();
        Ok(())
    }

    /// Predicate elements inside the current description.
    fn forward_triples(&mut self, w: &mut XmlWriter, property: &'a Property) -> Result<()> {
        let shape = if property.dematerialize {
            None
        } else {
            Some(self.resolver.resolve(property)?)
        };
        if property.is_reverse {
            if matches!(shape, Some(ResolvedShape::Primitive(_))) {
                return Err(GenerationError::ReversePrimitive {
                    property: property.psm_iri.clone(),
                });
            }
            return Ok(());
        }
        let predicate = self.predicate(property)?;
        let element = to_ncname(&property.technical_label);
        let Some(shape) = shape else {
            let target = graph::dematerialized_target(&self.resolver, property)?;
            let test = self.presence_test(target)?;
            if let Some(test) = &test {
                w.start("xsl:if", &[("test", test.as_str())]);
            }
            w.start(&predicate, &[]);
            Self::node(w, true, &format!("concat($suffix, '/{element}')"));
            w.end();
            if test.is_some() {
                w.end();
            }
            return Ok(());
        };
        w.start("xsl:for-each", &[("select", element.as_str())]);
        match shape {
            ResolvedShape::Primitive(primitives) => {
                match ResolvedShape::single_primitive(&primitives, property)? {
                    Primitive::CodelistReference(_) => {
                        w.start(&predicate, &[]);
                        w.empty("xsl:attribute", &[("name", "rdf:resource"), ("select", ".")]);
                        w.end();
                    }
                    Primitive::Datatype(RDF_LANG_STRING) => {
                        w.start(&predicate, &[]);
                        w.empty("xsl:copy-of", &[("select", "@xml:lang")]);
                        w.empty("xsl:value-of", &[("select", ".")]);
                        w.end();
                    }
                    Primitive::Datatype(datatype) => {
                        w.start(&predicate, &[("rdf:datatype", datatype)]);
                        w.empty("xsl:value-of", &[("select", ".")]);
                        w.end();
                    }
                }
            }
            ResolvedShape::SingleClass(_) | ResolvedShape::Choice(_) => {
                w.start(&predicate, &[]);
                Self::node(w, true, "''");
                w.end();
            }
        }
        w.end();
        Ok(())
    }

    /// Descriptions of related nodes, written after the current description.
    fn related_nodes(&mut self, w: &mut XmlWriter, property: &'a Property) -> Result<()> {
        let element = to_ncname(&property.technical_label);
        if property.dematerialize {
            let target = graph::dematerialized_target(&self.resolver, property)?;
            let suffix = format!("concat($suffix, '/{element}')");
            let test = self.presence_test(target)?;
            if let Some(test) = &test {
                w.start("xsl:if", &[("test", test.as_str())]);
            }
            if property.is_reverse {
                let predicate = self.predicate(property)?;
                w.start("rdf:Description", &[]);
                Self::node(w, false, &suffix);
                w.start(&predicate, &[]);
                Self::node(w, true, "$suffix");
                w.end();
                w.end();
            }
            self.call_class(w, target, Some(&suffix))?;
            if test.is_some() {
                w.end();
            }
            return Ok(());
        }
        let child = match self.resolver.resolve(property)? {
            ResolvedShape::Primitive(_) => return Ok(()),
            ResolvedShape::SingleClass(class) => Some(class),
            // A member is lifted by the root's template whatever its type, so
            // properties added by a derived candidate and its own `rdf:type`
            // are not lifted.
            ResolvedShape::Choice(plan) => match plan.base {
                ChoiceBase::Rooted { root, .. } => Some(root),
                ChoiceBase::Placeholder { .. } => None,
            },
        };
        if child.is_none() && !property.is_reverse {
            return Ok(());
        }
        w.start("xsl:for-each", &[("select", element.as_str())]);
        if property.is_reverse {
            let predicate = self.predicate(property)?;
            w.start("rdf:Description", &[]);
            Self::node(w, false, "''");
            w.start(&predicate, &[]);
            w.start("xsl:for-each", &[("select", "..")]);
            Self::node(w, true, "$suffix");
            w.end();
            w.end();
            w.end();
        }
        if let Some(child) = child {
            self.call_class(w, child, None)?;
        }
        w.end();
        Ok(())
    }

    fn node_template(w: &mut XmlWriter) {
        w.start("xsl:template", &[("name", NODE_TEMPLATE)]);
        w.empty("xsl:param", &[("name", "reference"), ("select", "false()")]);
        w.empty("xsl:param", &[("name", "suffix"), ("select", "''")]);
        w.start("xsl:choose", &[]);
        w.start("xsl:when", &[("test", "$suffix = '' and iri")]);
        w.empty(
            "xsl:attribute",
            &[
                (
                    "name",
                    "{if ($reference) then 'rdf:resource' else 'rdf:about'}",
                ),
                ("select", "normalize-space(iri)"),
            ],
        );
        w.end();
        w.start("xsl:otherwise", &[]);
        w.empty(
            "xsl:attribute",
            &[
                ("name", "rdf:nodeID"),
                (
                    "select",
                    "concat('n', generate-id(), translate($suffix, '/', '_'))",
                ),
            ],
        );
        w.end();
        w.end();
        w.end();
    }

    fn identity_template(w: &mut XmlWriter) {
        w.start("xsl:template", &[("match", "@*|node()")]);
        w.start("xsl:copy", &[]);
        w.empty("xsl:apply-templates", &[("select", "@*|node()")]);
        w.end();
        w.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use structura_model::builder::{ClassBuilder, ModelBuilder, PropertyBuilder};
    use structura_model::iris::{XSD_DATETIME, XSD_INTEGER, XSD_STRING};
    use structura_model::{ArtifactDescriptor, SpecificationManifest};

    fn lift(model: &StructureModel) -> Result<String> {
        generate(&GenerationInput::new(model, &[], &GeneratorConfig::default()))
    }

    fn person() -> StructureModel {
        ModelBuilder::new("m", "spec")
            .namespace("https://ex.org/ns", "ex")
            .root(&["P"])
            .class(
                ClassBuilder::new("P", "Person")
                    .cim("https://schema.org/Person")
                    .property(
                        PropertyBuilder::new("name", "https://schema.org/name")
                            .primitive(RDF_LANG_STRING),
                    )
                    .property(
                        PropertyBuilder::new("age", "https://schema.org/age")
                            .primitive(XSD_INTEGER)
                            .cardinality(0, Some(1)),
                    )
                    .property(
                        PropertyBuilder::new("country", "https://schema.org/country")
                            .association("K")
                            .cardinality(0, Some(1)),
                    )
                    .property(
                        PropertyBuilder::new("address", "https://schema.org/address")
                            .association("A")
                            .cardinality(0, None),
                    ),
            )
            .class(ClassBuilder::new("K", "Country").codelist())
            .class(
                ClassBuilder::new("A", "Address")
                    .cim("https://schema.org/PostalAddress")
                    .property(
                        PropertyBuilder::new("street", "https://schema.org/street")
                            .primitive(XSD_STRING),
                    ),
            )
            .build()
    }

    #[test]
    fn root_rule_delegates_to_class_template() -> Result<()> {
        let xslt = lift(&person())?;
        assert!(xslt.contains("<xsl:template match=\"/ex:Person\">"));
        assert!(xslt.contains("<xsl:call-template name=\"_P\"/>"));
        assert!(xslt.contains("<xsl:template name=\"_P\">"));
        assert!(xslt.contains("<xsl:template name=\"_A\">"));
        assert!(!xslt.contains("<xsl:template name=\"_K\">"));
        assert!(xslt.contains("<xsl:template match=\"@*|node()\">"));
        Ok(())
    }

    #[test]
    fn literals_carry_datatype_or_language() -> Result<()> {
        let xslt = lift(&person())?;
        assert!(xslt.contains("xmlns:ns0=\"https://schema.org/\""));
        assert!(xslt.contains("<rdf:type rdf:resource=\"https://schema.org/Person\"/>"));
        assert!(xslt.contains(
            "<ns0:age rdf:datatype=\"http://www.w3.org/2001/XMLSchema#integer\">"
        ));
        assert!(xslt.contains("<xsl:copy-of select=\"@xml:lang\"/>"));
        Ok(())
    }

    #[test]
    fn codelists_are_plain_references() -> Result<()> {
        let xslt = lift(&person())?;
        assert!(xslt.contains(
            "<xsl:for-each select=\"country\">\n        <ns0:country>\n          \
             <xsl:attribute name=\"rdf:resource\" select=\".\"/>"
        ));
        assert!(!xslt.contains("_K"));
        Ok(())
    }

    #[test]
    fn associations_reference_and_recurse() -> Result<()> {
        let xslt = lift(&person())?;
        assert_eq!(xslt.matches("<xsl:for-each select=\"address\">").count(), 2);
        assert!(xslt.contains("<xsl:call-template name=\"_A\"/>"));
        Ok(())
    }

    #[test]
    fn dematerialized_content_is_a_derived_node() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["E"])
            .class(
                ClassBuilder::new("E", "Event").property(
                    PropertyBuilder::new("period", "https://ex.org/period")
                        .association("T")
                        .dematerialize(),
                ),
            )
            .class(
                ClassBuilder::new("T", "Period")
                    .property(PropertyBuilder::new("start", "https://ex.org/start").primitive(XSD_DATETIME))
                    .property(PropertyBuilder::new("end", "https://ex.org/end").primitive(XSD_DATETIME)),
            )
            .build();
        let xslt = lift(&model)?;
        assert_eq!(xslt.matches("<xsl:if test=\"start or end\">").count(), 2);
        assert!(xslt.contains("select=\"concat($suffix, '/period')\""));
        assert!(!xslt.contains("<xsl:for-each select=\"period\">"));
        Ok(())
    }

    #[test]
    fn reverse_properties_point_back() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["P"])
            .class(ClassBuilder::new("P", "Person").property(
                PropertyBuilder::new("child", "https://ex.org/hasParent")
                    .association("C")
                    .reverse()
                    .cardinality(0, None),
            ))
            .class(ClassBuilder::new("C", "Child"))
            .build();
        let xslt = lift(&model)?;
        assert!(xslt.contains("<xsl:for-each select=\"..\">"));
        assert_eq!(xslt.matches("<ns0:hasParent>").count(), 1);
        Ok(())
    }

    #[test]
    fn several_primitives_are_refused() {
        let model = ModelBuilder::new("m", "spec")
            .root(&["P"])
            .class(ClassBuilder::new("P", "P").property(
                PropertyBuilder::new("v", "https://ex.org/v")
                    .primitive(XSD_STRING)
                    .primitive(XSD_INTEGER),
            ))
            .build();
        assert!(matches!(
            lift(&model),
            Err(GenerationError::MultiplePrimitiveTypes { .. })
        ));
    }

    #[test]
    fn predicates_need_a_local_name() {
        let model = ModelBuilder::new("m", "spec")
            .root(&["P"])
            .class(ClassBuilder::new("P", "P").property(
                PropertyBuilder::new("v", "https://ex.org/p/7").primitive(XSD_STRING),
            ))
            .build();
        assert!(matches!(
            lift(&model),
            Err(GenerationError::UnserializablePredicate { .. })
        ));
    }

    #[test]
    fn foreign_templates_are_imported() -> Result<()> {
        let model = ModelBuilder::new("schema-a", "spec-a")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("address", "https://ex.org/address").association("B"),
            ))
            .class(ClassBuilder::new("B", "Address").owned_by("spec-b", "schema-b"))
            .build();
        let manifests = vec![SpecificationManifest {
            id: "spec-b".to_string(),
            artifacts: vec![ArtifactDescriptor {
                generator: GeneratorKind::XsltLifting,
                source_model: "schema-b".to_string(),
                public_address: "spec-b/lifting.xslt".to_string(),
                namespace: None,
                namespace_prefix: None,
            }],
        }];
        let mut config = GeneratorConfig::default();
        config.output.base_address = "spec-a/".to_string();
        let xslt = generate(&GenerationInput::new(&model, &manifests, &config))?;
        assert!(xslt.contains("<xsl:import href=\"../spec-b/lifting.xslt\"/>"));
        assert!(xslt.contains("<xsl:call-template name=\"_B\"/>"));
        assert!(!xslt.contains("<xsl:template name=\"_B\">"));
        Ok(())
    }

    #[test]
    fn roots_sharing_a_name_refuse_the_stylesheet() {
        let model = ModelBuilder::new("m", "spec")
            .root(&["A"])
            .root(&["B"])
            .class(ClassBuilder::new("A", "Person"))
            .class(ClassBuilder::new("B", "Person"))
            .build();
        assert!(matches!(
            lift(&model),
            Err(GenerationError::DuplicateRootElement { .. })
        ));
    }

    #[test]
    fn choice_members_lift_through_the_root_template() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("item", "https://ex.org/item")
                    .association("A")
                    .association("B"),
            ))
            .class(ClassBuilder::new("A", "Agent").cim("https://ex.org/Agent"))
            .class(
                ClassBuilder::new("B", "Bot")
                    .cim("https://ex.org/Bot")
                    .extends("A"),
            )
            .build();
        let xslt = lift(&model)?;
        assert!(xslt.contains("<xsl:call-template name=\"_A\"/>"));
        assert!(!xslt.contains("<xsl:call-template name=\"_B\"/>"));
        Ok(())
    }
}
