use std::{collections::HashMap, sync::Arc};

use getset::Getters;

use log::info;

use crate::{
    config::{LocationConfiguration, LocationMatch},
    modules::HttpModule,
    phases::PhaseHandler,
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown directive \"{directive}\" in location '{location}'")]
    UnknownDirective { directive: String, location: String },

    #[error("invalid number of arguments in \"{directive}\" directive in location '{location}'")]
    InvalidArgumentCount { directive: String, location: String },

    #[error("empty directive in location '{location}'")]
    EmptyDirective { location: String },

    #[error("duplicate location '{location}'")]
    DuplicateLocation { location: String },
}

#[derive(Getters)]
pub struct Location {
    #[getset(get = "pub")]
    path: String,
    #[getset(get = "pub")]
    location_match: LocationMatch,
    content_handler: Option<Arc<dyn PhaseHandler>>,
}

impl Location {
    fn new(path: &str, location_match: LocationMatch) -> Self {
        Self {
            path: path.to_string(),
            location_match,
            content_handler: None,
        }
    }

    /// Installs the handler that alone serves the content phase here.
    pub fn set_content_handler(&mut self, handler: Arc<dyn PhaseHandler>) {
        self.content_handler = Some(handler);
    }

    pub fn content_handler(&self) -> Option<&Arc<dyn PhaseHandler>> {
        self.content_handler.as_ref()
    }

    fn apply_directive(
        &mut self,
        line: &str,
        modules: &[Arc<dyn HttpModule>],
    ) -> Result<(), ConfigError> {
        let mut words = line.split_whitespace();

        let name = words.next().ok_or_else(|| ConfigError::EmptyDirective {
            location: self.path.clone(),
        })?;
        let args: Vec<&str> = words.collect();

        let (module, directive) = modules
            .iter()
            .find_map(|module| {
                module
                    .directives()
                    .iter()
                    .find(|directive| directive.name == name)
                    .map(|directive| (module, directive))
            })
            .ok_or_else(|| ConfigError::UnknownDirective {
                directive: name.to_string(),
                location: self.path.clone(),
            })?;

        if args.len() != directive.args {
            return Err(ConfigError::InvalidArgumentCount {
                directive: name.to_string(),
                location: self.path.clone(),
            });
        }

        module.set_directive(directive, &args, self)
    }
}

/// Location table: exact matches first, then the longest matching prefix.
pub struct Locations {
    exact: HashMap<String, Location>,
    prefix: Vec<Location>,
}

impl Locations {
    pub fn new(
        configurations: &[LocationConfiguration],
        modules: &[Arc<dyn HttpModule>],
    ) -> Result<Self, ConfigError> {
        let mut locations = Self {
            exact: HashMap::new(),
            prefix: Vec::new(),
        };

        for configuration in configurations {
            let mut location =
                Location::new(configuration.path(), *configuration.location_match());

            for line in configuration.directives() {
                location.apply_directive(line, modules)?;
            }

            info!(
                "location {:?} '{}' content handler {:?}",
                location.location_match,
                location.path,
                location.content_handler.as_ref().map(|h| h.name()),
            );

            locations.insert(location)?;
        }

        locations
            .prefix
            .sort_by(|a, b| b.path.len().cmp(&a.path.len()));

        Ok(locations)
    }

    fn insert(&mut self, location: Location) -> Result<(), ConfigError> {
        let duplicate = match location.location_match {
            LocationMatch::Exact => self.exact.contains_key(&location.path),
            LocationMatch::Prefix => self.prefix.iter().any(|l| l.path == location.path),
        };

        if duplicate {
            return Err(ConfigError::DuplicateLocation {
                location: location.path,
            });
        }

        match location.location_match {
            LocationMatch::Exact => {
                self.exact.insert(location.path.clone(), location);
            }
            LocationMatch::Prefix => self.prefix.push(location),
        }

        Ok(())
    }

    pub fn find(&self, uri: &str) -> Option<&Location> {
        self.exact
            .get(uri)
            .or_else(|| self.prefix.iter().find(|l| uri.starts_with(l.path.as_str())))
    }
}
