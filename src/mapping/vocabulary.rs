//! @acp:module "Tag Vocabularies"
//! @acp:summary "Closed sets of tag kinds recognized in mapping documents"
//! @acp:domain core
//! @acp:layer model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported mapping document dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Hibernate ORM `<hibernate-mapping>` document
    Hibernate,
    /// Spring `<beans>` bean-definition document
    Spring,
}

impl DocumentKind {
    pub fn all() -> &'static [DocumentKind] {
        &[DocumentKind::Hibernate, DocumentKind::Spring]
    }

    /// Tag name of the document element
    pub fn root_tag(&self) -> &'static str {
        match self {
            DocumentKind::Hibernate => "hibernate-mapping",
            DocumentKind::Spring => "beans",
        }
    }

    /// Tag name of one convertible unit
    pub fn unit_tag(&self) -> &'static str {
        match self {
            DocumentKind::Hibernate => "class",
            DocumentKind::Spring => "bean",
        }
    }

    /// Attribute naming the unit's Java class
    pub fn unit_class_attr(&self) -> &'static str {
        match self {
            DocumentKind::Hibernate => "name",
            DocumentKind::Spring => "class",
        }
    }

    pub fn from_root_tag(tag: &str) -> Option<DocumentKind> {
        Self::all().iter().copied().find(|k| k.root_tag() == tag)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Hibernate => "Hibernate mapping",
            DocumentKind::Spring => "Spring beans",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tag kinds of the Hibernate mapping vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HibernateTag {
    Class,
    Id,
    Generator,
    Column,
    Property,
    ManyToOne,
    OneToMany,
    ManyToMany,
    CompositeId,
    KeyProperty,
    KeyManyToOne,
    JoinTable,
    JoinColumn,
}

impl HibernateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            HibernateTag::Class => "class",
            HibernateTag::Id => "id",
            HibernateTag::Generator => "generator",
            HibernateTag::Column => "column",
            HibernateTag::Property => "property",
            HibernateTag::ManyToOne => "many-to-one",
            HibernateTag::OneToMany => "one-to-many",
            HibernateTag::ManyToMany => "many-to-many",
            HibernateTag::CompositeId => "composite-id",
            HibernateTag::KeyProperty => "key-property",
            HibernateTag::KeyManyToOne => "key-many-to-one",
            HibernateTag::JoinTable => "join-table",
            HibernateTag::JoinColumn => "join-column",
        }
    }
}

impl FromStr for HibernateTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(HibernateTag::Class),
            "id" => Ok(HibernateTag::Id),
            "generator" => Ok(HibernateTag::Generator),
            "column" => Ok(HibernateTag::Column),
            "property" => Ok(HibernateTag::Property),
            "many-to-one" => Ok(HibernateTag::ManyToOne),
            "one-to-many" => Ok(HibernateTag::OneToMany),
            "many-to-many" => Ok(HibernateTag::ManyToMany),
            "composite-id" => Ok(HibernateTag::CompositeId),
            "key-property" => Ok(HibernateTag::KeyProperty),
            "key-many-to-one" => Ok(HibernateTag::KeyManyToOne),
            "join-table" => Ok(HibernateTag::JoinTable),
            "join-column" => Ok(HibernateTag::JoinColumn),
            _ => Err(format!("Unknown Hibernate tag: {}", s)),
        }
    }
}

impl fmt::Display for HibernateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag kinds of the Spring bean vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeanTag {
    Bean,
    Property,
    ConstructorArg,
    Ref,
    Value,
}

impl BeanTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeanTag::Bean => "bean",
            BeanTag::Property => "property",
            BeanTag::ConstructorArg => "constructor-arg",
            BeanTag::Ref => "ref",
            BeanTag::Value => "value",
        }
    }
}

impl FromStr for BeanTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bean" => Ok(BeanTag::Bean),
            "property" => Ok(BeanTag::Property),
            "constructor-arg" => Ok(BeanTag::ConstructorArg),
            "ref" => Ok(BeanTag::Ref),
            "value" => Ok(BeanTag::Value),
            _ => Err(format!("Unknown bean tag: {}", s)),
        }
    }
}

impl fmt::Display for BeanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
