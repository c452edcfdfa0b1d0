use std::collections::BTreeMap;

use serde::Deserialize;
use shared::domain::{NodeId, Rect};

use crate::{Document, Element, Result};

/// Declarative element tree, used to load pages from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub layout: Option<Rect>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

fn default_tag() -> String {
    "div".into()
}

impl ElementSpec {
    fn to_element(&self) -> Element {
        let mut element = Element::new(&self.tag)
            .with_value(self.value.clone())
            .with_text(self.text.clone())
            .with_checked(self.checked);
        if let Some(class) = &self.class {
            element = element.with_class(class);
        }
        for (name, value) in &self.attrs {
            element = element.with_attr(name.clone(), value.clone());
        }
        if let Some(id) = &self.id {
            element = element.with_id(id.clone());
        }
        element.set_layout(self.layout);
        element
    }
}

impl Document {
    /// Builds a document whose body holds `spec.children`. Attributes and
    /// classes set on `spec` itself are applied to the body.
    pub fn from_spec(spec: &ElementSpec) -> Result<Self> {
        let mut document = Document::new();
        let body = document.body();
        {
            let element = document.element_mut(body)?;
            if let Some(class) = &spec.class {
                for class in class.split_whitespace() {
                    element.add_class(class);
                }
            }
            for (name, value) in &spec.attrs {
                element.set_attr(name.clone(), value.clone());
            }
        }
        for child in &spec.children {
            document.append_spec(body, child)?;
        }
        Ok(document)
    }

    pub fn append_spec(&mut self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId> {
        let node = self.append_element(parent, spec.to_element())?;
        for child in &spec.children {
            self.append_spec(node, child)?;
        }
        Ok(node)
    }
}
