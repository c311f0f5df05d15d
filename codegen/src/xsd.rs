//! XML Schema generator.
//!
//! Emits one global element per root candidate. Class content models are
//! inlined, or extracted into named groups or types according to the
//! extraction toggles; classes re-entered along the current inlining path,
//! choice bases and derived choice candidates are always named types so the
//! schema stays finite. Declarations are queued as they are referenced and
//! emitted after the root elements, in first-reference order.

use std::collections::{HashMap, HashSet, VecDeque};

use structura_model::iris::{VC_NS, XML_NS, XML_NS_SCHEMA_LOCATION, XS_NS};
use structura_model::{Class, GeneratorKind, LanguageString, Property, StructureModel};

use crate::config::{Extraction, ExtractionToggle};
use crate::emit::XmlWriter;
use crate::error::{GenerationError, Result};
use crate::graph;
use crate::imports::{ImportDescriptor, ImportResolution, ImportResolver, ImportTable};
use crate::mapping::{
    schema_type, to_ncname, ClassNames, SchemaType, IRI_ELEMENT, LANG_STRING_TYPE,
};
use crate::types::{ChoiceBase, ChoicePlan, Primitive, ResolvedShape, TypeResolver};
use crate::GenerationInput;

/// Prefix bound to the target namespace when the model declares none.
const DEFAULT_TARGET_PREFIX: &str = "tns";

/// Generates the XML Schema of a model.
///
/// # Errors
///
/// Returns a [`GenerationError`] if the model is malformed, splices a class
/// into itself, or references a foreign class no sibling schema covers.
pub fn generate(input: &GenerationInput<'_>) -> Result<String> {
    let resolver = TypeResolver::new(input.model);
    graph::check_dematerialization(&resolver)?;
    let schema = SchemaBuilder::new(input, resolver)?;
    schema.build()
}

#[derive(Debug, Clone)]
enum Declaration<'a> {
    Type(&'a Class),
    Group(&'a Class),
    Placeholder(String),
}

#[derive(Debug, Default)]
struct Occurs {
    min: Option<String>,
    max: Option<String>,
}

impl Occurs {
    fn of(property: &Property) -> Self {
        use structura_model::MaxCardinality;
        Self {
            min: (property.cardinality_min != 1).then(|| property.cardinality_min.to_string()),
            max: match property.cardinality_max {
                MaxCardinality::Bounded(1) => None,
                MaxCardinality::Bounded(n) => Some(n.to_string()),
                MaxCardinality::Unbounded => Some("unbounded".to_string()),
            },
        }
    }

    fn extend<'s>(&'s self, attrs: &mut Vec<(&'static str, &'s str)>) {
        if let Some(min) = &self.min {
            attrs.push(("minOccurs", min.as_str()));
        }
        if let Some(max) = &self.max {
            attrs.push(("maxOccurs", max.as_str()));
        }
    }
}

struct SchemaBuilder<'a> {
    model: &'a StructureModel,
    resolver: TypeResolver<'a>,
    extraction: &'a Extraction,
    names: ClassNames,
    imports: ImportResolver<'a>,
    import_table: ImportTable,
    target_prefix: Option<String>,
    extended: HashSet<&'a str>,
    requested: HashSet<String>,
    placeholders: HashMap<String, String>,
    queue: VecDeque<Declaration<'a>>,
    uses_lang_string: bool,
}

impl<'a> SchemaBuilder<'a> {
    fn new(input: &GenerationInput<'a>, resolver: TypeResolver<'a>) -> Result<Self> {
        let model = input.model;
        let target_prefix = model.namespace.as_ref().map(|_| {
            model
                .namespace_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_PREFIX.to_string())
        });
        let mut reserved = vec!["xs", "vc", "xml"];
        if let Some(prefix) = &target_prefix {
            reserved.push(prefix.as_str());
        }
        let import_table = ImportTable::new(&reserved);
        let mut builder = Self {
            model,
            resolver,
            extraction: &input.config.extraction,
            names: ClassNames::new(model),
            imports: input.import_resolver(GeneratorKind::XmlSchema),
            import_table,
            target_prefix,
            extended: HashSet::new(),
            requested: HashSet::new(),
            placeholders: HashMap::new(),
            queue: VecDeque::new(),
            uses_lang_string: false,
        };
        builder.collect_extensions()?;
        Ok(builder)
    }

    /// Derived choice candidates are declared as extensions of their parent
    /// wherever their named type is used.
    fn collect_extensions(&mut self) -> Result<()> {
        let model = self.model;
        for class in &model.classes {
            if model.is_foreign(class) || class.is_codelist {
                continue;
            }
            for property in &class.properties {
                if let ResolvedShape::Choice(plan) = self.resolver.resolve(property)? {
                    for derivation in plan.derived() {
                        if !model.is_foreign(derivation.class) {
                            self.extended.insert(&derivation.class.psm_iri);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn build(mut self) -> Result<String> {
        let mut body = XmlWriter::with_depth(1);
        for class in self.resolver.root_classes()? {
            self.root_element(&mut body, class)?;
        }
        while let Some(declaration) = self.queue.pop_front() {
            self.declaration(&mut body, declaration)?;
        }
        if self.uses_lang_string {
            self.lang_string(&mut body);
        }
        log::debug!(
            "schema: {} declarations, {} imports",
            self.requested.len(),
            self.import_table.entries().len()
        );
        Ok(self.assemble(&body.finish()))
    }

    fn assemble(&self, body: &str) -> String {
        let mut attrs: Vec<(String, String)> = vec![
            ("xmlns:xs".into(), XS_NS.into()),
            ("xmlns:vc".into(), VC_NS.into()),
            ("vc:minVersion".into(), "1.1".into()),
            ("version".into(), "1.1".into()),
            ("elementFormDefault".into(), "unqualified".into()),
        ];
        if let (Some(namespace), Some(prefix)) = (&self.model.namespace, &self.target_prefix) {
            attrs.push(("targetNamespace".into(), namespace.clone()));
            attrs.push((format!("xmlns:{prefix}"), namespace.clone()));
        }
        for entry in self.import_table.entries() {
            if let (Some(prefix), Some(namespace)) = (&entry.prefix, &entry.descriptor.namespace) {
                attrs.push((format!("xmlns:{prefix}"), namespace.clone()));
            }
        }
        let attrs: Vec<(&str, &str)> = attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut w = XmlWriter::new();
        w.declaration();
        w.start("xs:schema", &attrs);
        if self.uses_lang_string {
            w.empty(
                "xs:import",
                &[
                    ("namespace", XML_NS),
                    ("schemaLocation", XML_NS_SCHEMA_LOCATION),
                ],
            );
        }
        for entry in self.import_table.entries() {
            let location = entry.descriptor.reference.as_str();
            match &entry.descriptor.namespace {
                Some(namespace) => w.empty(
                    "xs:import",
                    &[("namespace", namespace.as_str()), ("schemaLocation", location)],
                ),
                None => w.empty("xs:include", &[("schemaLocation", location)]),
            }
        }
        w.raw(body);
        w.finish()
    }

    fn qualified(&self, local: &str) -> String {
        match &self.target_prefix {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }

    fn toggle(&self, class: &Class) -> ExtractionToggle {
        if self.model.is_root_class(&class.psm_iri) {
            self.extraction.root
        } else {
            self.extraction.other
        }
    }

    fn request(&mut self, key: String, declaration: Declaration<'a>) {
        if self.requested.insert(key) {
            self.queue.push_back(declaration);
        }
    }

    fn request_type(&mut self, class: &'a Class) -> String {
        self.request(format!("type {}", class.psm_iri), Declaration::Type(class));
        self.qualified(self.names.get(class))
    }

    fn request_group(&mut self, class: &'a Class) -> String {
        self.request(format!("group {}", class.psm_iri), Declaration::Group(class));
        self.qualified(self.names.get(class))
    }

    fn foreign_type(&mut self, descriptor: ImportDescriptor, class: &Class) -> String {
        let local = self.names.get(class).to_string();
        let entry = self.import_table.register(descriptor);
        match &entry.prefix {
            Some(prefix) => format!("{prefix}:{local}"),
            // A no-namespace include is adopted into the target namespace.
            None => self.qualified(&local),
        }
    }

    /// Returns the QName of the named type of a class, declaring or importing it.
    fn type_ref(&mut self, class: &'a Class) -> Result<String> {
        Ok(match self.imports.resolve(class)? {
            ImportResolution::Import(descriptor) => self.foreign_type(descriptor, class),
            ImportResolution::Local => self.request_type(class),
        })
    }

    fn annotation(w: &mut XmlWriter, label: &LanguageString) {
        if label.is_empty() {
            return;
        }
        w.start("xs:annotation", &[]);
        for (language, text) in label {
            w.text_element("xs:documentation", &[("xml:lang", language.as_str())], text);
        }
        w.end();
    }

    fn root_element(&mut self, w: &mut XmlWriter, class: &'a Class) -> Result<()> {
        let name = to_ncname(&class.technical_label);
        let toggle = self.toggle(class);
        let local = matches!(self.imports.resolve(class)?, ImportResolution::Local);
        if !local || toggle.named_type {
            let ty = self.type_ref(class)?;
            if class.human_label.is_empty() {
                w.empty("xs:element", &[("name", name.as_str()), ("type", ty.as_str())]);
            } else {
                w.start("xs:element", &[("name", name.as_str()), ("type", ty.as_str())]);
                Self::annotation(w, &class.human_label);
                w.end();
            }
            return Ok(());
        }
        w.start("xs:element", &[("name", name.as_str())]);
        Self::annotation(w, &class.human_label);
        w.start("xs:complexType", &[]);
        if toggle.group {
            let group = self.request_group(class);
            w.empty("xs:group", &[("ref", group.as_str())]);
        } else {
            let mut path = vec![class.psm_iri.as_str()];
            self.sequence(w, class, &mut path, true)?;
        }
        w.end();
        w.end();
        Ok(())
    }

    fn sequence(
        &mut self,
        w: &mut XmlWriter,
        class: &'a Class,
        path: &mut Vec<&'a str>,
        with_iri: bool,
    ) -> Result<()> {
        w.start("xs:sequence", &[]);
        self.members(w, class, path, with_iri)?;
        w.end();
        Ok(())
    }

    fn members(
        &mut self,
        w: &mut XmlWriter,
        class: &'a Class,
        path: &mut Vec<&'a str>,
        with_iri: bool,
    ) -> Result<()> {
        if with_iri {
            w.empty(
                "xs:element",
                &[
                    ("name", IRI_ELEMENT),
                    ("type", "xs:anyURI"),
                    ("minOccurs", "0"),
                ],
            );
        }
        for property in self.resolver.effective_properties(class)? {
            self.member(w, property, path)?;
        }
        Ok(())
    }

    fn member(
        &mut self,
        w: &mut XmlWriter,
        property: &'a Property,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        let occurs = Occurs::of(property);
        if property.dematerialize {
            let target = graph::dematerialized_target(&self.resolver, property)?;
            if property.is_single() {
                return self.members(w, target, path, false);
            }
            let mut attrs = Vec::new();
            occurs.extend(&mut attrs);
            w.start("xs:sequence", &attrs);
            self.members(w, target, path, false)?;
            w.end();
            return Ok(());
        }
        let name = to_ncname(&property.technical_label);
        match self.resolver.resolve(property)? {
            ResolvedShape::Primitive(primitives) => {
                if property.is_reverse {
                    return Err(GenerationError::ReversePrimitive {
                        property: property.psm_iri.clone(),
                    });
                }
                self.primitive_member(w, &name, &occurs, &primitives);
            }
            ResolvedShape::SingleClass(target) => {
                self.class_member(w, &name, &occurs, target, path)?;
            }
            ResolvedShape::Choice(plan) => {
                let ty = self.choice_type(&plan)?;
                let mut attrs = vec![("name", name.as_str()), ("type", ty.as_str())];
                occurs.extend(&mut attrs);
                w.empty("xs:element", &attrs);
            }
        }
        Ok(())
    }

    fn simple_type(&mut self, primitive: &Primitive<'_>) -> String {
        match primitive {
            Primitive::CodelistReference(_) => "xs:anyURI".to_string(),
            Primitive::Datatype(iri) => match schema_type(iri) {
                SchemaType::Builtin(local) => format!("xs:{local}"),
                SchemaType::LangString => {
                    self.uses_lang_string = true;
                    self.qualified(LANG_STRING_TYPE)
                }
            },
        }
    }

    fn primitive_member(
        &mut self,
        w: &mut XmlWriter,
        name: &str,
        occurs: &Occurs,
        primitives: &[Primitive<'_>],
    ) {
        if let [one] = primitives {
            let ty = self.simple_type(one);
            let mut attrs = vec![("name", name), ("type", ty.as_str())];
            occurs.extend(&mut attrs);
            w.empty("xs:element", &attrs);
            return;
        }
        // Union members must be simple; language-tagged text falls back to xs:string.
        let mut members: Vec<String> = Vec::new();
        for primitive in primitives {
            let member = match primitive {
                Primitive::Datatype(iri) if schema_type(iri) == SchemaType::LangString => {
                    "xs:string".to_string()
                }
                other => self.simple_type(other),
            };
            if !members.contains(&member) {
                members.push(member);
            }
        }
        let mut attrs = vec![("name", name)];
        occurs.extend(&mut attrs);
        w.start("xs:element", &attrs);
        w.start("xs:simpleType", &[]);
        w.empty("xs:union", &[("memberTypes", members.join(" ").as_str())]);
        w.end();
        w.end();
    }

    fn class_member(
        &mut self,
        w: &mut XmlWriter,
        name: &str,
        occurs: &Occurs,
        target: &'a Class,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        let toggle = self.toggle(target);
        let local = matches!(self.imports.resolve(target)?, ImportResolution::Local);
        let recursive = path.contains(&target.psm_iri.as_str());
        if !local || toggle.named_type || recursive {
            let ty = self.type_ref(target)?;
            let mut attrs = vec![("name", name), ("type", ty.as_str())];
            occurs.extend(&mut attrs);
            w.empty("xs:element", &attrs);
            return Ok(());
        }
        let mut attrs = vec![("name", name)];
        occurs.extend(&mut attrs);
        w.start("xs:element", &attrs);
        w.start("xs:complexType", &[]);
        if toggle.group {
            let group = self.request_group(target);
            w.empty("xs:group", &[("ref", group.as_str())]);
        } else {
            path.push(&target.psm_iri);
            self.sequence(w, target, path, true)?;
            path.pop();
        }
        w.end();
        w.end();
        Ok(())
    }

    fn choice_type(&mut self, plan: &ChoicePlan<'a>) -> Result<String> {
        match &plan.base {
            ChoiceBase::Rooted { root, derived } => {
                let base = self.type_ref(*root)?;
                for derivation in derived {
                    self.type_ref(derivation.class)?;
                }
                Ok(base)
            }
            ChoiceBase::Placeholder { name } => {
                let key = plan
                    .candidates
                    .iter()
                    .map(|c| c.psm_iri.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let local = match self.placeholders.get(&key) {
                    Some(local) => local.clone(),
                    None => {
                        let local = self.names.reserve(&to_ncname(name));
                        self.placeholders.insert(key, local.clone());
                        self.queue.push_back(Declaration::Placeholder(local.clone()));
                        local
                    }
                };
                Ok(self.qualified(&local))
            }
        }
    }

    fn declaration(&mut self, w: &mut XmlWriter, declaration: Declaration<'a>) -> Result<()> {
        match declaration {
            Declaration::Type(class) => {
                let name = self.names.get(class).to_string();
                w.start("xs:complexType", &[("name", name.as_str())]);
                Self::annotation(w, &class.human_label);
                let mut path = vec![class.psm_iri.as_str()];
                if self.extended.contains(class.psm_iri.as_str()) {
                    self.extension(w, class, &mut path)?;
                } else {
                    self.sequence(w, class, &mut path, true)?;
                }
                w.end();
            }
            Declaration::Group(class) => {
                let name = self.names.get(class).to_string();
                w.start("xs:group", &[("name", name.as_str())]);
                let mut path = vec![class.psm_iri.as_str()];
                self.sequence(w, class, &mut path, true)?;
                w.end();
            }
            Declaration::Placeholder(name) => {
                w.start("xs:complexType", &[("name", name.as_str())]);
                w.start("xs:sequence", &[]);
                w.empty(
                    "xs:element",
                    &[
                        ("name", IRI_ELEMENT),
                        ("type", "xs:anyURI"),
                        ("minOccurs", "0"),
                    ],
                );
                w.end();
                w.end();
            }
        }
        Ok(())
    }

    fn extension(
        &mut self,
        w: &mut XmlWriter,
        class: &'a Class,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        let Some(parent) = self.resolver.parent(class)? else {
            return self.sequence(w, class, path, true);
        };
        let base = self.type_ref(parent)?;
        w.start("xs:complexContent", &[]);
        w.start("xs:extension", &[("base", base.as_str())]);
        w.start("xs:sequence", &[]);
        for property in &class.properties {
            self.member(w, property, path)?;
        }
        w.end();
        w.end();
        w.end();
        Ok(())
    }

    fn lang_string(&self, w: &mut XmlWriter) {
        w.start("xs:complexType", &[("name", LANG_STRING_TYPE)]);
        w.start("xs:simpleContent", &[]);
        w.start("xs:extension", &[("base", "xs:string")]);
        w.empty("xs:attribute", &[("ref", "xml:lang"), ("use", "required")]);
        w.end();
        w.end();
        w.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use structura_model::builder::{ClassBuilder, ModelBuilder, PropertyBuilder};
    use structura_model::iris::{RDF_LANG_STRING, XSD_DATETIME, XSD_INTEGER, XSD_STRING};
    use structura_model::{ArtifactDescriptor, SpecificationManifest};

    fn generate_with(model: &StructureModel, config: &GeneratorConfig) -> Result<String> {
        generate(&GenerationInput::new(model, &[], config))
    }

    fn person() -> StructureModel {
        ModelBuilder::new("https://ex.org/psm", "spec-a")
            .namespace("https://ex.org/ns", "ex")
            .root(&["P"])
            .class(
                ClassBuilder::new("P", "Person")
                    .cim("https://schema.org/Person")
                    .property(PropertyBuilder::new("name", "https://schema.org/name").primitive(XSD_STRING))
                    .property(
                        PropertyBuilder::new("born", "https://schema.org/birthDate")
                            .primitive(XSD_DATETIME)
                            .cardinality(0, Some(1)),
                    )
                    .property(
                        PropertyBuilder::new("address", "https://schema.org/address")
                            .association("A")
                            .cardinality(0, None),
                    ),
            )
            .class(
                ClassBuilder::new("A", "Address")
                    .property(PropertyBuilder::new("street", "https://schema.org/street").primitive(XSD_STRING)),
            )
            .build()
    }

    #[test]
    fn inlines_by_default() -> Result<()> {
        let xsd = generate_with(&person(), &GeneratorConfig::default())?;
        assert!(xsd.contains("targetNamespace=\"https://ex.org/ns\""));
        assert!(xsd.contains("<xs:element name=\"Person\">"));
        assert!(xsd.contains("<xs:element name=\"iri\" type=\"xs:anyURI\" minOccurs=\"0\"/>"));
        assert!(xsd.contains("<xs:element name=\"name\" type=\"xs:string\"/>"));
        assert!(xsd.contains(
            "<xs:element name=\"born\" type=\"xs:dateTimeStamp\" minOccurs=\"0\"/>"
        ));
        assert!(xsd.contains(
            "<xs:element name=\"address\" minOccurs=\"0\" maxOccurs=\"unbounded\">"
        ));
        assert!(!xsd.contains("<xs:complexType name="));
        Ok(())
    }

    #[test]
    fn extraction_toggles_name_types_and_groups() -> Result<()> {
        let mut config = GeneratorConfig::default();
        config.extraction.root.named_type = true;
        config.extraction.other.group = true;
        let xsd = generate_with(&person(), &config)?;
        assert!(xsd.contains("<xs:element name=\"Person\" type=\"ex:Person\"/>"));
        assert!(xsd.contains("<xs:complexType name=\"Person\">"));
        assert!(xsd.contains("<xs:group ref=\"ex:Address\"/>"));
        assert!(xsd.contains("<xs:group name=\"Address\">"));
        Ok(())
    }

    #[test]
    fn recursion_is_broken_by_named_types() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["P"])
            .class(ClassBuilder::new("P", "Person").property(
                PropertyBuilder::new("knows", "ex:knows")
                    .association("P")
                    .cardinality(0, None),
            ))
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert!(xsd.contains(
            "<xs:element name=\"knows\" type=\"Person\" minOccurs=\"0\" maxOccurs=\"unbounded\"/>"
        ));
        assert_eq!(xsd.matches("<xs:complexType name=\"Person\">").count(), 1);
        Ok(())
    }

    fn choice(extra_root: bool) -> StructureModel {
        let mut owner = PropertyBuilder::new("item", "ex:item").association("A").association("B");
        if extra_root {
            owner = owner.association("X");
        } else {
            owner = owner.association("C");
        }
        ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(owner))
            .class(
                ClassBuilder::new("A", "A")
                    .property(PropertyBuilder::new("a", "ex:a").primitive(XSD_STRING)),
            )
            .class(
                ClassBuilder::new("B", "B")
                    .extends("A")
                    .property(PropertyBuilder::new("b", "ex:b").primitive(XSD_INTEGER)),
            )
            .class(ClassBuilder::new("C", "C").extends("A"))
            .class(ClassBuilder::new("X", "X").extends("B"))
            .build()
    }

    #[test]
    fn rooted_choice_declares_extensions() -> Result<()> {
        let xsd = generate_with(&choice(false), &GeneratorConfig::default())?;
        assert!(xsd.contains("<xs:element name=\"item\" type=\"A\"/>"));
        assert_eq!(xsd.matches("<xs:extension base=\"A\">").count(), 2);
        assert!(xsd.contains("<xs:complexType name=\"B\">"));
        assert!(xsd.contains("<xs:complexType name=\"C\">"));
        Ok(())
    }

    #[test]
    fn several_roots_declare_one_placeholder() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("item", "ex:item").association("A").association("Z"),
            ))
            .class(ClassBuilder::new("A", "A"))
            .class(ClassBuilder::new("Z", "Z"))
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert!(xsd.contains("<xs:element name=\"item\" type=\"AZ\"/>"));
        assert!(xsd.contains("<xs:complexType name=\"AZ\">"));
        assert!(!xsd.contains("xs:extension"));
        Ok(())
    }

    #[test]
    fn chained_derivation_extends_in_set_parent() -> Result<()> {
        let xsd = generate_with(&choice(true), &GeneratorConfig::default())?;
        assert!(xsd.contains("<xs:extension base=\"A\">"));
        assert!(xsd.contains("<xs:extension base=\"B\">"));
        Ok(())
    }

    #[test]
    fn codelists_are_uri_references() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("country", "ex:country")
                    .association("K")
                    .cardinality(0, Some(1)),
            ))
            .class(ClassBuilder::new("K", "Country").codelist())
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert!(xsd.contains("<xs:element name=\"country\" type=\"xs:anyURI\" minOccurs=\"0\"/>"));
        assert!(!xsd.contains("Country"));
        Ok(())
    }

    #[test]
    fn dematerialized_members_are_spliced() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("period", "ex:period")
                    .association("T")
                    .dematerialize(),
            ))
            .class(
                ClassBuilder::new("T", "Period")
                    .property(PropertyBuilder::new("start", "ex:start").primitive(XSD_DATETIME))
                    .property(PropertyBuilder::new("end", "ex:end").primitive(XSD_DATETIME)),
            )
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert!(!xsd.contains("name=\"period\""));
        assert!(xsd.contains("<xs:element name=\"start\" type=\"xs:dateTimeStamp\"/>"));
        assert!(xsd.contains("<xs:element name=\"end\" type=\"xs:dateTimeStamp\"/>"));
        assert_eq!(xsd.matches("name=\"iri\"").count(), 1);
        Ok(())
    }

    #[test]
    fn lang_string_is_declared_once() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(
                ClassBuilder::new("H", "Holder")
                    .property(PropertyBuilder::new("title", "ex:title").primitive(RDF_LANG_STRING))
                    .property(
                        PropertyBuilder::new("note", "ex:note")
                            .primitive(RDF_LANG_STRING)
                            .cardinality(0, None),
                    ),
            )
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert_eq!(xsd.matches("<xs:complexType name=\"langString\">").count(), 1);
        assert!(xsd.contains("<xs:attribute ref=\"xml:lang\" use=\"required\"/>"));
        assert!(xsd.contains("schemaLocation=\"http://www.w3.org/2001/xml.xsd\""));
        Ok(())
    }

    #[test]
    fn several_primitives_form_a_union() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("v", "ex:v")
                    .primitive(XSD_STRING)
                    .primitive(XSD_INTEGER),
            ))
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert!(xsd.contains("<xs:union memberTypes=\"xs:string xs:integer\"/>"));
        Ok(())
    }

    #[test]
    fn foreign_classes_are_imported() -> Result<()> {
        let model = ModelBuilder::new("schema-a", "spec-a")
            .namespace("https://a.example/ns", "a")
            .root(&["H"])
            .class(ClassBuilder::new("H", "Holder").property(
                PropertyBuilder::new("address", "ex:address").association("B"),
            ))
            .class(ClassBuilder::new("B", "Address").owned_by("spec-b", "schema-b"))
            .build();
        let manifests = vec![SpecificationManifest {
            id: "spec-b".to_string(),
            artifacts: vec![ArtifactDescriptor {
                generator: GeneratorKind::XmlSchema,
                source_model: "schema-b".to_string(),
                public_address: "../spec-b/schema.xsd".to_string(),
                namespace: Some("https://b.example/ns".to_string()),
                namespace_prefix: Some("a".to_string()),
            }],
        }];
        let config = GeneratorConfig::default();
        let xsd = generate(&GenerationInput::new(&model, &manifests, &config))?;
        assert!(xsd.contains("xmlns:imp0=\"https://b.example/ns\""));
        assert!(xsd.contains(
            "<xs:import namespace=\"https://b.example/ns\" schemaLocation=\"../spec-b/schema.xsd\"/>"
        ));
        assert!(xsd.contains("<xs:element name=\"address\" type=\"imp0:Address\"/>"));
        assert!(!xsd.contains("<xs:complexType name=\"Address\">"));
        Ok(())
    }

    #[test]
    fn unresolved_imports_refuse_the_schema() {
        let model = ModelBuilder::new("schema-a", "spec-a")
            .root(&["B"])
            .class(ClassBuilder::new("B", "Address").owned_by("spec-b", "schema-b"))
            .build();
        let err = generate_with(&model, &GeneratorConfig::default());
        assert!(matches!(err, Err(GenerationError::UnresolvedImport { .. })));
    }

    #[test]
    fn roots_sharing_a_name_refuse_the_schema() {
        let model = ModelBuilder::new("m", "spec")
            .root(&["A", "B"])
            .class(ClassBuilder::new("A", "Person"))
            .class(ClassBuilder::new("B", "Person"))
            .build();
        let err = generate_with(&model, &GeneratorConfig::default());
        assert!(matches!(err, Err(GenerationError::DuplicateRootElement { .. })));
    }

    #[test]
    fn repeated_root_candidates_declare_one_element() -> Result<()> {
        let model = ModelBuilder::new("m", "spec")
            .root(&["P"])
            .root(&["P"])
            .class(ClassBuilder::new("P", "Person"))
            .build();
        let xsd = generate_with(&model, &GeneratorConfig::default())?;
        assert_eq!(xsd.matches("<xs:element name=\"Person\"").count(), 1);
        Ok(())
    }
}
