use crate::handler::{
    AudioClipHandler, ExtractHandler, FontHandler, MovieTextureHandler, ShaderHandler,
    TextAssetHandler,
};
use std::collections::BTreeMap;

/// Class name to handler lookup.
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Box<dyn ExtractHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TextAssetHandler));
        registry.register(Box::new(AudioClipHandler));
        registry.register(Box::new(FontHandler));
        registry.register(Box::new(MovieTextureHandler));
        registry.register(Box::new(ShaderHandler));
        registry
    }

    /// Adds a handler, replacing any previous one for the same class.
    pub fn register(&mut self, handler: Box<dyn ExtractHandler>) {
        self.handlers
            .insert(handler.class_name().to_string(), handler);
    }

    pub fn get(&self, class_name: &str) -> Option<&dyn ExtractHandler> {
        self.handlers.get(class_name).map(|h| h.as_ref())
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.handlers.contains_key(class_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::RawHandler;

    #[test]
    fn test_default_handlers() {
        let registry = HandlerRegistry::with_defaults();
        assert_eq!(registry.len(), 5);
        assert!(registry.contains("TextAsset"));
        assert!(registry.contains("AudioClip"));
        assert!(!registry.contains("Texture2D"));

        let font = registry.get("Font").unwrap();
        assert_eq!(font.file_extension(), "ttf");
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = HandlerRegistry::with_defaults();
        registry.register(Box::new(RawHandler::new("Shader")));

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get("Shader").unwrap().file_extension(), "bin");
    }

    #[test]
    fn test_class_names_sorted() {
        let registry = HandlerRegistry::with_defaults();
        let names: Vec<&str> = registry.class_names().collect();
        assert_eq!(
            names,
            vec!["AudioClip", "Font", "MovieTexture", "Shader", "TextAsset"]
        );
    }
}
