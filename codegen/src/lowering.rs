//! XSLT lowering generator: SPARQL query results in the XML results format
//! are transformed back into XML documents of the generated schema.
//!
//! The stylesheet treats the result rows as a triple table. Nodes are joined
//! through one key, `f:id-key`, built from the kind and value of an RDF term,
//! so IRIs and blank nodes are matched the same way everywhere.

use structura_model::iris::{RDF_TYPE, SPARQL_RESULTS_NS, XSI_NS, XSLT_NS, XS_NS};
use structura_model::{Class, GeneratorKind, Property, StructureModel};

use crate::config::BindingNames;
use crate::emit::XmlWriter;
use crate::error::{GenerationError, Result};
use crate::graph;
use crate::imports::{ImportResolution, ImportResolver, ImportTable};
use crate::mapping::{template_name, to_ncname, ClassNames, IRI_ELEMENT};
use crate::types::{ChoiceBase, ChoicePlan, Primitive, ResolvedShape, TypeResolver};
use crate::GenerationInput;

/// Namespace of the stylesheet's own functions.
pub const FUNCTION_NS: &str = "urn:structura:lowering";

const DEFAULT_TARGET_PREFIX: &str = "tns";

/// Quotes a string as an XPath literal.
fn xpath_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Generates the lowering stylesheet of a model.
///
/// # Errors
///
/// Returns a [`GenerationError`] if the model is malformed, uses several
/// primitive types on one property, has a root or choice candidate without
/// an interpretation, or references a foreign class no sibling stylesheet
/// covers.
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
    let mut reserved = vec!["xsl", "xs", "sp", "f", "xsi"];
    if let Some(prefix) = &target_prefix {
        reserved.push(prefix.as_str());
    }
    let mut builder = LoweringBuilder {
        model: input.model,
        resolver,
        names: ClassNames::new(input.model),
        bindings: &input.config.bindings,
        imports: input.import_resolver(GeneratorKind::XsltLowering),
        import_table: ImportTable::new(&reserved),
        schema_imports: input.import_resolver(GeneratorKind::XmlSchema),
        type_namespaces: ImportTable::new(&reserved),
        target_prefix,
    };
    builder.build()
}

struct LoweringBuilder<'a> {
    model: &'a StructureModel,
    resolver: TypeResolver<'a>,
    names: ClassNames,
    bindings: &'a BindingNames,
    imports: ImportResolver<'a>,
    import_table: ImportTable,
    /// Foreign types are declared by sibling schemas, not stylesheets.
    schema_imports: ImportResolver<'a>,
    type_namespaces: ImportTable,
    target_prefix: Option<String>,
}

impl<'a> LoweringBuilder<'a> {
    fn build(&mut self) -> Result<String> {
        let model = self.model;
        let mut body = XmlWriter::with_depth(1);
        Self::entry_rules(&mut body);
        let candidates = self.resolver.root_classes()?;
        for (i, &class) in candidates.iter().enumerate() {
            let priority = (candidates.len() - i).to_string();
            self.root_rule(&mut body, class, &priority)?;
        }
        for class in &model.classes {
            if model.is_foreign(class) || class.is_codelist {
                continue;
            }
            self.class_template(&mut body, class)?;
        }
        Self::value_rules(&mut body);
        log::debug!("lowering: {} root rules", candidates.len());
        Ok(self.assemble(&body.finish()))
    }

    fn assemble(&self, body: &str) -> String {
        let mut attrs: Vec<(String, String)> = vec![
            ("version".into(), "2.0".into()),
            ("xmlns:xsl".into(), XSLT_NS.into()),
            ("xmlns:xs".into(), XS_NS.into()),
            ("xmlns:sp".into(), SPARQL_RESULTS_NS.into()),
            ("xmlns:f".into(), FUNCTION_NS.into()),
            ("xmlns:xsi".into(), XSI_NS.into()),
        ];
        if let (Some(prefix), Some(namespace)) = (&self.target_prefix, &self.model.namespace) {
            attrs.push((format!("xmlns:{prefix}"), namespace.clone()));
        }
        for entry in self.type_namespaces.entries() {
            if let (Some(prefix), Some(namespace)) = (&entry.prefix, &entry.descriptor.namespace) {
                attrs.push((format!("xmlns:{prefix}"), namespace.clone()));
            }
        }
        attrs.push(("exclude-result-prefixes".into(), "xs sp f".into()));
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
        for (name, default) in [
            ("subj", &self.bindings.subject),
            ("pred", &self.bindings.predicate),
            ("obj", &self.bindings.object),
        ] {
            let select = xpath_string(default);
            w.empty(
                "xsl:param",
                &[("name", name), ("select", select.as_str()), ("as", "xs:string")],
            );
        }
        let rdf_type = xpath_string(RDF_TYPE);
        w.empty(
            "xsl:variable",
            &[("name", "type"), ("select", rdf_type.as_str()), ("as", "xs:string")],
        );
        w.empty(
            "xsl:variable",
            &[("name", "results"), ("select", "/sp:sparql/sp:results/sp:result")],
        );
        Self::functions(&mut w);
        w.raw(body);
        w.finish()
    }

    fn functions(w: &mut XmlWriter) {
        w.start("xsl:function", &[("name", "f:id-key"), ("as", "xs:string")]);
        w.empty("xsl:param", &[("name", "term"), ("as", "element()?")]);
        w.empty(
            "xsl:sequence",
            &[(
                "select",
                "if (empty($term)) then '' else \
                 concat(local-name($term), '|', string($term))",
            )],
        );
        w.end();

        w.start("xsl:function", &[("name", "f:rows"), ("as", "element()*")]);
        w.empty("xsl:param", &[("name", "role"), ("as", "xs:string")]);
        w.empty("xsl:param", &[("name", "key"), ("as", "xs:string")]);
        w.empty("xsl:param", &[("name", "predicate"), ("as", "xs:string")]);
        w.empty(
            "xsl:sequence",
            &[(
                "select",
                "$results[sp:binding[@name = $role]/*/f:id-key(.) = $key \
                 and sp:binding[@name = $pred]/sp:uri = $predicate]",
            )],
        );
        w.end();
    }

    fn entry_rules(w: &mut XmlWriter) {
        w.start("xsl:template", &[("match", "/")]);
        w.empty("xsl:apply-templates", &[("select", "$results")]);
        w.end();
        w.empty("xsl:template", &[("match", "sp:result")]);
    }

    fn root_rule(&mut self, w: &mut XmlWriter, class: &'a Class, priority: &str) -> Result<()> {
        let cim = class
            .cim_iri
            .as_deref()
            .ok_or_else(|| GenerationError::MissingInterpretation {
                class: class.psm_iri.clone(),
                purpose: "root dispatch",
            })?;
        let pattern = format!(
            "sp:result[sp:binding[@name = $pred]/sp:uri = $type \
             and sp:binding[@name = $obj]/sp:uri = {}]",
            xpath_string(cim)
        );
        let element = match &self.target_prefix {
            Some(prefix) => format!("{prefix}:{}", to_ncname(&class.technical_label)),
            None => to_ncname(&class.technical_label),
        };
        w.start(
            "xsl:template",
            &[("match", pattern.as_str()), ("priority", priority)],
        );
        w.start(&element, &[]);
        self.call_class(w, class, "sp:binding[@name = $subj]/*", None, false)?;
        w.end();
        w.end();
        Ok(())
    }

    /// Calls the template of a class, importing it if the class is foreign.
    fn call_class(
        &mut self,
        w: &mut XmlWriter,
        class: &Class,
        id: &str,
        type_name: Option<&str>,
        no_iri: bool,
    ) -> Result<()> {
        if let ImportResolution::Import(descriptor) = self.imports.resolve(class)? {
            self.import_table.register(descriptor);
        }
        let name = template_name(&class.psm_iri);
        w.start("xsl:call-template", &[("name", name.as_str())]);
        w.empty("xsl:with-param", &[("name", "id"), ("select", id)]);
        if let Some(type_name) = type_name {
            let select = xpath_string(type_name);
            w.empty(
                "xsl:with-param",
                &[("name", "type_name"), ("select", select.as_str())],
            );
        }
        if no_iri {
            w.empty("xsl:with-param", &[("name", "no_iri"), ("select", "true()")]);
        }
        w.end();
        Ok(())
    }

    fn class_template(&mut self, w: &mut XmlWriter, class: &'a Class) -> Result<()> {
        let name = template_name(&class.psm_iri);
        w.start("xsl:template", &[("name", name.as_str())]);
        w.empty("xsl:param", &[("name", "id"), ("as", "element()")]);
        w.empty(
            "xsl:param",
            &[("name", "type_name"), ("as", "xs:string?"), ("select", "()")],
        );
        w.empty(
            "xsl:param",
            &[("name", "no_iri"), ("as", "xs:boolean"), ("select", "false()")],
        );
        w.start("xsl:if", &[("test", "exists($type_name)")]);
        w.empty("xsl:attribute", &[("name", "xsi:type"), ("select", "$type_name")]);
        w.end();
        w.start("xsl:if", &[("test", "not($no_iri) and $id/self::sp:uri")]);
        w.start(IRI_ELEMENT, &[]);
        w.empty("xsl:value-of", &[("select", "$id")]);
        w.end();
        w.end();
        w.empty("xsl:variable", &[("name", "key"), ("select", "f:id-key($id)")]);
        for property in self.resolver.effective_properties(class)? {
            self.property(w, property)?;
        }
        w.end();
        Ok(())
    }

    fn property(&mut self, w: &mut XmlWriter, property: &'a Property) -> Result<()> {
        let (role, value) = if property.is_reverse {
            ("$obj", "$subj")
        } else {
            ("$subj", "$obj")
        };
        let rows = format!(
            "f:rows({role}, $key, {})",
            xpath_string(&property.cim_iri)
        );
        let member = format!("sp:binding[@name = {value}]/*");
        if property.dematerialize {
            let target = graph::dematerialized_target(&self.resolver, property)?;
            w.start("xsl:for-each", &[("select", rows.as_str())]);
            self.call_class(w, target, &member, None, true)?;
            w.end();
            return Ok(());
        }
        let element = to_ncname(&property.technical_label);
        match self.resolver.resolve(property)? {
            ResolvedShape::Primitive(primitives) => {
                if property.is_reverse {
                    return Err(GenerationError::ReversePrimitive {
                        property: property.psm_iri.clone(),
                    });
                }
                let primitive = ResolvedShape::single_primitive(&primitives, property)?;
                w.start("xsl:for-each", &[("select", rows.as_str())]);
                w.start(&element, &[]);
                match primitive {
                    Primitive::CodelistReference(_) => {
                        w.empty("xsl:value-of", &[("select", member.as_str())]);
                    }
                    Primitive::Datatype(_) => {
                        w.empty(
                            "xsl:apply-templates",
                            &[("select", member.as_str()), ("mode", "value")],
                        );
                    }
                }
                w.end();
                w.end();
            }
            ResolvedShape::SingleClass(class) => {
                w.start("xsl:for-each", &[("select", rows.as_str())]);
                w.start(&element, &[]);
                self.call_class(w, class, &member, None, false)?;
                w.end();
                w.end();
            }
            ResolvedShape::Choice(plan) => {
                w.start("xsl:for-each", &[("select", rows.as_str())]);
                w.start(&element, &[]);
                w.empty("xsl:variable", &[("name", "member"), ("select", member.as_str())]);
                self.dispatch(w, &plan)?;
                w.end();
                w.end();
            }
        }
        Ok(())
    }

    /// Picks the first candidate, in declaration order, whose interpretation
    /// is among the member's `rdf:type` values.
    fn dispatch(&mut self, w: &mut XmlWriter, plan: &ChoicePlan<'a>) -> Result<()> {
        let root = match &plan.base {
            ChoiceBase::Placeholder { .. } => {
                w.start("xsl:if", &[("test", "$member/self::sp:uri")]);
                w.start(IRI_ELEMENT, &[]);
                w.empty("xsl:value-of", &[("select", "$member")]);
                w.end();
                w.end();
                return Ok(());
            }
            ChoiceBase::Rooted { root, .. } => *root,
        };
        w.empty(
            "xsl:variable",
            &[
                ("name", "types"),
                (
                    "select",
                    "f:rows($subj, f:id-key($member), $type)/sp:binding[@name = $obj]/sp:uri",
                ),
            ],
        );
        w.start("xsl:choose", &[]);
        for &candidate in &plan.candidates {
            let cim = candidate.cim_iri.as_deref().ok_or_else(|| {
                GenerationError::MissingInterpretation {
                    class: candidate.psm_iri.clone(),
                    purpose: "choice dispatch",
                }
            })?;
            let test = format!("$types = {}", xpath_string(cim));
            w.start("xsl:when", &[("test", test.as_str())]);
            let type_name = if std::ptr::eq(candidate, root) {
                None
            } else {
                Some(self.type_name(candidate)?)
            };
            self.call_class(w, candidate, "$member", type_name.as_deref(), false)?;
            w.end();
        }
        w.start("xsl:otherwise", &[]);
        self.call_class(w, root, "$member", None, false)?;
        w.end();
        w.end();
        Ok(())
    }

    /// The `xsi:type` value naming a derived candidate. A foreign type is
    /// qualified with the namespace of the sibling schema declaring it.
    fn type_name(&mut self, class: &Class) -> Result<String> {
        let (prefix, local) = if self.model.is_foreign(class) {
            let prefix = match self.schema_imports.resolve(class)? {
                ImportResolution::Import(descriptor) => {
                    self.type_namespaces.register(descriptor).prefix.clone()
                }
                ImportResolution::Local => None,
            };
            (prefix, to_ncname(&class.technical_label))
        } else {
            (self.target_prefix.clone(), self.names.get(class).to_string())
        };
        Ok(match prefix {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local,
        })
    }

    /// Literal values keep their language tag. The datatype annotation is
    /// dropped: the schema fixes the type of every element, and a datatype
    /// outside XSD (mapped to `xs:anySimpleType`) has no `xsi:type` to name it.
    fn value_rules(w: &mut XmlWriter) {
        w.start("xsl:template", &[("match", "sp:literal"), ("mode", "value")]);
        w.empty("xsl:copy-of", &[("select", "@xml:lang")]);
        w.empty("xsl:value-of", &[("select", ".")]);
        w.end();
        w.start("xsl:template", &[("match", "sp:uri | sp:bnode"), ("mode", "value")]);
        w.empty("xsl:value-of", &[("select", ".")]);
        w.end();
    }
}
