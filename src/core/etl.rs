use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let view = self.pipeline.name();
        tracing::info!("🚀 Building view '{}'", view);

        let raw = self.pipeline.extract().await?;
        tracing::debug!("{}: extract finished", view);
        self.monitor.log_phase(view, "extract");

        let output = self.pipeline.transform(raw).await?;
        tracing::debug!("{}: transform finished", view);
        self.monitor.log_phase(view, "transform");

        let output_path = self.pipeline.load(output).await?;
        tracing::info!("📁 {}: output saved to {}", view, output_path);
        self.monitor.log_final(view);

        Ok(output_path)
    }
}
