use log::{debug, trace};

use crate::error::{Result, WkError};
use crate::handler::GeometryHandler;
use crate::io::Provider;

/// Decodes the provider's current feature into handler events.
pub trait ReadFeature {
    type Provider: Provider;

    fn provider(&self) -> &Self::Provider;

    fn provider_mut(&mut self) -> &mut Self::Provider;

    /// Emits `feature_start`, then either `null_feature` or one top-level geometry, then
    /// `feature_end`.
    fn read_feature<H: GeometryHandler + ?Sized>(
        &mut self,
        feature_id: usize,
        handler: &mut H,
    ) -> Result<()>;
}

/// Drives a decoder feature by feature into a bound handler.
pub struct Reader<'h, D, H: ?Sized> {
    decoder: D,
    handler: Option<&'h mut H>,
    feature_id: usize,
}

impl<'h, D: ReadFeature, H: GeometryHandler + ?Sized> Reader<'h, D, H> {
    pub fn new(mut decoder: D) -> Self {
        decoder.provider_mut().reset();
        Self {
            decoder,
            handler: None,
            feature_id: 0,
        }
    }

    pub fn set_handler(&mut self, handler: &'h mut H) {
        self.handler = Some(handler);
    }

    pub fn reset(&mut self) {
        self.decoder.provider_mut().reset();
        self.feature_id = 0;
    }

    pub fn has_next_feature(&mut self) -> bool {
        self.decoder.provider_mut().seek_next_feature()
    }

    pub fn n_features(&self) -> usize {
        self.decoder.provider().n_features()
    }

    /// Reads the current feature.
    ///
    /// A parse error is offered to the handler's [`next_error`](GeometryHandler::next_error)
    /// and swallowed if the handler accepts it. Usage errors always propagate.
    pub fn iterate_feature(&mut self) -> Result<()> {
        let handler = self.handler.as_deref_mut().ok_or(WkError::HandlerUnset)?;
        let feature_id = self.feature_id;
        self.feature_id += 1;

        trace!("reading feature {feature_id}");
        match self.decoder.read_feature(feature_id, handler) {
            Err(err) if err.is_parse_error() => {
                if handler.next_error(&err, feature_id)? {
                    debug!("feature {feature_id} skipped: {err}");
                    Ok(())
                } else {
                    Err(err)
                }
            }
            result => result,
        }
    }

    /// Reads every remaining feature between `initialize` and `deinitialize`.
    pub fn run(&mut self) -> Result<()> {
        self.run_with_interrupt(|| false)
    }

    /// Like [`Reader::run`], calling `interrupted` between features and stopping with
    /// [`WkError::Interrupted`] once it returns true.
    pub fn run_with_interrupt<F: FnMut() -> bool>(&mut self, mut interrupted: F) -> Result<()> {
        let handler = self.handler.as_deref_mut().ok_or(WkError::HandlerUnset)?;
        handler.initialize()?;
        debug!("reading {} features", self.n_features());

        while self.has_next_feature() {
            if interrupted() {
                debug!("interrupted before feature {}", self.feature_id);
                return Err(WkError::Interrupted);
            }
            self.iterate_feature()?;
        }

        debug!("read {} features", self.feature_id);
        let handler = self.handler.as_deref_mut().ok_or(WkError::HandlerUnset)?;
        handler.deinitialize()
    }

    pub fn into_decoder(self) -> D {
        self.decoder
    }
}

/// Runs every feature of `decoder` through `handler`.
pub fn translate<D: ReadFeature, H: GeometryHandler + ?Sized>(
    decoder: D,
    handler: &mut H,
) -> Result<()> {
    let mut reader = Reader::new(decoder);
    reader.set_handler(handler);
    reader.run()
}
