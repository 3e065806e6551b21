//! Release plans
//!
//! Both builders are pure: the same inputs always give the same plan.

use rigger_core::{
    Asset, ChartMetadata, HelmAsset, KustomizeStep, MessageStep, Release, ReleaseMetadata, Spec,
    Step, WorkspaceLayout,
};
use std::path::Path;

/// Builds the step pipeline for a workspace
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    layout: WorkspaceLayout,
}

impl ReleaseBuilder {
    pub fn new(layout: WorkspaceLayout) -> Self {
        Self { layout }
    }

    /// Plan for a resolved chart: render, stage values, overlay, report
    pub fn build(&self, chart: &ChartMetadata) -> Release {
        let asset = HelmAsset {
            dest: self.layout.rendered_helm_path(),
            description: Some(format!("{} {}", chart.name, chart.version).trim().to_string()),
            chart_root: self.layout.chart_path(),
            helm_opts: vec![
                "--values".to_string(),
                self.layout.helm_values_file().display().to_string(),
            ],
            values: Default::default(),
        };

        Release {
            metadata: ReleaseMetadata::for_chart(chart.clone()),
            spec: Spec {
                assets: vec![Asset::Helm(asset)],
                config: Vec::new(),
                lifecycle: vec![
                    Step::HelmIntro,
                    Step::HelmValues,
                    Step::Render,
                    Step::Kustomize(KustomizeStep {
                        base_path: self.layout.rendered_helm_path(),
                        dest: self.layout.overlay_path(),
                        generated_base: true,
                    }),
                    self.deploy_message(),
                ],
            },
        }
    }

    /// Plan for pre-rendered manifests: overlay and report only
    pub fn build_raw(&self, raw_path: &Path) -> Release {
        Release {
            metadata: ReleaseMetadata::default(),
            spec: Spec {
                assets: Vec::new(),
                config: Vec::new(),
                lifecycle: vec![
                    Step::Kustomize(KustomizeStep {
                        base_path: raw_path.to_path_buf(),
                        dest: self.layout.overlay_path(),
                        generated_base: false,
                    }),
                    self.deploy_message(),
                ],
            },
        }
    }

    fn deploy_message(&self) -> Step {
        Step::Message(MessageStep {
            contents: format!(
                "Assets are ready to deploy. You can run\n\n    kubectl apply -f {}\n\nto deploy the overlaid assets to your cluster.",
                self.layout.output_file().display()
            ),
        })
    }
}
