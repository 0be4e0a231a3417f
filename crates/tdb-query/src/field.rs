//! Queryable fields.
//!
//! Every identifier in a query resolves to a [`Field`] when the query is
//! compiled. Bare names read the AU, except `title`, `doi`, `eissn`,
//! `issn`, `issnl` and `type`, which read the AU's title, and `publisher`,
//! which reads the publisher's name. The `au:`, `title:` and `publisher:`
//! prefixes select an entity explicitly and also accept any raw key, e.g.
//! `title:frequency` or `au:attr[color]`.

use std::borrow::Cow;
use std::fmt;

use tdb_model::AuContext;
use tdb_store::KeyPath;

/// Values read from the AU itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuField {
    Auid,
    AuidPlus,
    Edition,
    Eisbn,
    Isbn,
    File,
    Line,
    FileLine,
    Name,
    Plugin,
    PluginPrefix,
    PluginSuffix,
    Provider,
    Proxy,
    Rights,
    Status,
    Status1,
    Status2,
    Volume,
    Year,
}

impl AuField {
    fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "auid" => AuField::Auid,
            "auidplus" => AuField::AuidPlus,
            "edition" => AuField::Edition,
            "eisbn" => AuField::Eisbn,
            "isbn" => AuField::Isbn,
            "file" => AuField::File,
            "line" => AuField::Line,
            "fileline" => AuField::FileLine,
            "name" => AuField::Name,
            "plugin" => AuField::Plugin,
            "pluginPrefix" => AuField::PluginPrefix,
            "pluginSuffix" => AuField::PluginSuffix,
            "provider" => AuField::Provider,
            "proxy" => AuField::Proxy,
            "rights" => AuField::Rights,
            "status" => AuField::Status,
            "status1" => AuField::Status1,
            "status2" => AuField::Status2,
            "volume" => AuField::Volume,
            "year" => AuField::Year,
            _ => return None,
        };
        Some(field)
    }

    /// The query-language name.
    pub fn as_str(self) -> &'static str {
        match self {
            AuField::Auid => "auid",
            AuField::AuidPlus => "auidplus",
            AuField::Edition => "edition",
            AuField::Eisbn => "eisbn",
            AuField::Isbn => "isbn",
            AuField::File => "file",
            AuField::Line => "line",
            AuField::FileLine => "fileline",
            AuField::Name => "name",
            AuField::Plugin => "plugin",
            AuField::PluginPrefix => "pluginPrefix",
            AuField::PluginSuffix => "pluginSuffix",
            AuField::Provider => "provider",
            AuField::Proxy => "proxy",
            AuField::Rights => "rights",
            AuField::Status => "status",
            AuField::Status1 => "status1",
            AuField::Status2 => "status2",
            AuField::Volume => "volume",
            AuField::Year => "year",
        }
    }
}

/// Values read from the AU's title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TitleField {
    Name,
    Doi,
    Eissn,
    Eisbn,
    Isbn,
    Issn,
    Issnl,
    Type,
}

impl TitleField {
    fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "name" => TitleField::Name,
            "doi" => TitleField::Doi,
            "eissn" => TitleField::Eissn,
            "eisbn" => TitleField::Eisbn,
            "isbn" => TitleField::Isbn,
            "issn" => TitleField::Issn,
            "issnl" => TitleField::Issnl,
            "type" => TitleField::Type,
            _ => return None,
        };
        Some(field)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TitleField::Name => "name",
            TitleField::Doi => "doi",
            TitleField::Eissn => "eissn",
            TitleField::Eisbn => "eisbn",
            TitleField::Isbn => "isbn",
            TitleField::Issn => "issn",
            TitleField::Issnl => "issnl",
            TitleField::Type => "type",
        }
    }
}

/// Values read from the publisher of the AU's title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublisherField {
    Name,
}

/// A resolved query identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Au(AuField),
    Title(TitleField),
    Publisher(PublisherField),
    /// `param[k]`: a defining plugin parameter.
    Param(String),
    /// `nondefparam[k]`: a non-defining plugin parameter.
    NondefParam(String),
    /// `attr[k]`: an AU attribute.
    Attr(String),
    /// `au:<key>`: any raw AU key.
    AuKey(KeyPath),
    /// `title:<key>`: any raw title key.
    TitleKey(KeyPath),
    /// `publisher:<key>`: any raw publisher key.
    PublisherKey(KeyPath),
}

impl Field {
    /// Resolve a query identifier, or `None` if it names no field.
    pub fn resolve(identifier: &str) -> Option<Field> {
        let (qualifier, key) = match identifier.split_once(':') {
            Some((q, rest)) => (Some(q), rest),
            None => (None, identifier),
        };
        let path = KeyPath::parse(key).ok()?;
        let leaf = (path.len() == 1).then(|| path.head());

        match qualifier {
            None => {
                if let Some(name) = leaf {
                    if let Some(field) = Self::bare(name) {
                        return Some(field);
                    }
                }
                Self::au_group(&path)
            }
            Some("au") => leaf
                .and_then(AuField::from_name)
                .map(Field::Au)
                .or_else(|| Self::au_group(&path))
                .or(Some(Field::AuKey(path))),
            Some("title") => leaf
                .and_then(TitleField::from_name)
                .map(Field::Title)
                .or(Some(Field::TitleKey(path))),
            Some("publisher") => match leaf {
                Some("name") => Some(Field::Publisher(PublisherField::Name)),
                _ => Some(Field::PublisherKey(path)),
            },
            Some(_) => None,
        }
    }

    /// Unqualified single names.
    fn bare(name: &str) -> Option<Field> {
        let field = match name {
            "title" => Field::Title(TitleField::Name),
            "doi" => Field::Title(TitleField::Doi),
            "eissn" => Field::Title(TitleField::Eissn),
            "issn" => Field::Title(TitleField::Issn),
            "issnl" => Field::Title(TitleField::Issnl),
            "type" => Field::Title(TitleField::Type),
            "publisher" => Field::Publisher(PublisherField::Name),
            other => return AuField::from_name(other).map(Field::Au),
        };
        Some(field)
    }

    /// `param[k]`, `nondefparam[k]` and `attr[k]`.
    fn au_group(path: &KeyPath) -> Option<Field> {
        let [group, key] = path.segments() else {
            return None;
        };
        let key = key.clone();
        match group.as_str() {
            "param" => Some(Field::Param(key)),
            "nondefparam" => Some(Field::NondefParam(key)),
            "attr" => Some(Field::Attr(key)),
            _ => None,
        }
    }

    /// This field's value for one AU, or `None` if it is not defined.
    pub fn value<'a>(&self, ctx: &AuContext<'a>) -> Option<Cow<'a, str>> {
        let au = ctx.au;
        let borrowed = |v: Option<&'a str>| v.map(Cow::Borrowed);
        match self {
            Field::Au(field) => match field {
                AuField::Auid => borrowed(au.auid()),
                AuField::AuidPlus => borrowed(au.auidplus()),
                AuField::Edition => borrowed(au.edition()),
                AuField::Eisbn => borrowed(au.eisbn()),
                AuField::Isbn => borrowed(au.isbn()),
                AuField::File => Some(Cow::Borrowed(au.location().source_name.as_str())),
                AuField::Line => Some(Cow::Owned(au.location().line.to_string())),
                AuField::FileLine => Some(Cow::Owned(au.location().to_string())),
                AuField::Name => borrowed(au.name()),
                AuField::Plugin => borrowed(au.plugin()),
                AuField::PluginPrefix => borrowed(au.plugin_prefix()),
                AuField::PluginSuffix => borrowed(au.plugin_suffix()),
                AuField::Provider => borrowed(au.provider()),
                AuField::Proxy => borrowed(au.proxy()),
                AuField::Rights => borrowed(au.rights()),
                AuField::Status => borrowed(au.status()),
                AuField::Status1 => borrowed(au.status1()),
                AuField::Status2 => borrowed(au.status2()),
                AuField::Volume => borrowed(au.volume()),
                AuField::Year => borrowed(au.year()),
            },
            Field::Title(field) => {
                let title = ctx.title?;
                match field {
                    TitleField::Name => borrowed(title.name()),
                    TitleField::Doi => borrowed(title.doi()),
                    TitleField::Eissn => borrowed(title.eissn()),
                    TitleField::Eisbn => borrowed(title.eisbn()),
                    TitleField::Isbn => borrowed(title.isbn()),
                    TitleField::Issn => borrowed(title.issn()),
                    TitleField::Issnl => borrowed(title.issnl()),
                    TitleField::Type => Some(Cow::Borrowed(title.title_type())),
                }
            }
            Field::Publisher(PublisherField::Name) => borrowed(ctx.publisher?.name()),
            Field::Param(key) => borrowed(au.param(key)),
            Field::NondefParam(key) => borrowed(au.nondef_param(key)),
            Field::Attr(key) => borrowed(au.attr(key)),
            Field::AuKey(path) => borrowed(au.get(path)),
            Field::TitleKey(path) => borrowed(ctx.title?.get(path)),
            Field::PublisherKey(path) => borrowed(ctx.publisher?.get(path)),
        }
    }
}

/// Renders the identifier in query syntax; [`Field::resolve`] reads it back.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Au(field) => f.write_str(field.as_str()),
            Field::Title(field) => write!(f, "title:{}", field.as_str()),
            Field::Publisher(PublisherField::Name) => f.write_str("publisher:name"),
            Field::Param(key) => write!(f, "param[{key}]"),
            Field::NondefParam(key) => write!(f, "nondefparam[{key}]"),
            Field::Attr(key) => write!(f, "attr[{key}]"),
            Field::AuKey(path) => write!(f, "au:{path}"),
            Field::TitleKey(path) => write!(f, "title:{path}"),
            Field::PublisherKey(path) => write!(f, "publisher:{path}"),
        }
    }
}
