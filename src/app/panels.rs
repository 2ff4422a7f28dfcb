use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::graph::classify::NodeCategory;

use super::RepographApp;
use super::view::category_color;

fn health_color(score: f32) -> Color32 {
    if score >= 80.0 {
        Color32::from_rgb(63, 185, 80)
    } else if score >= 50.0 {
        Color32::from_rgb(210, 153, 34)
    } else {
        Color32::from_rgb(248, 81, 73)
    }
}

impl RepographApp {
    pub(super) fn show_top_bar(&mut self, ctx: &Context) {
        let mut refresh_requested = false;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("repograph");
                    ui.separator();

                    if let Some(meta) = &self.model.data.meta {
                        ui.label(RichText::new(&meta.repo_name).strong())
                            .on_hover_text(format!("{}\n{}", meta.repo_url, meta.project_root));
                        ui.label(
                            RichText::new(format!("health {:.0}%", meta.system_health))
                                .color(health_color(meta.system_health)),
                        );
                        ui.label(format!(
                            "{} of {} files shown",
                            self.model.data.nodes.len(),
                            meta.total_files
                        ));
                    } else {
                        ui.label(RichText::new("demo data").weak());
                        ui.label(format!("{} nodes", self.model.data.nodes.len()));
                    }

                    let can_refresh = self.store.active().is_some()
                        && self.pending_scan.is_none()
                        && self.backend.is_some();
                    if ui
                        .add_enabled(can_refresh, egui::Button::new("Rescan"))
                        .clicked()
                    {
                        refresh_requested = true;
                    }
                    if self.pending_scan.is_some() {
                        ui.spinner();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = &self.status {
                            let color = if status.is_error {
                                Color32::from_rgb(248, 81, 73)
                            } else {
                                Color32::from_gray(170)
                            };
                            ui.label(RichText::new(&status.text).color(color));
                        }
                    });
                });
            });

        if refresh_requested {
            self.refresh_active();
        }
    }

    pub(super) fn show_repo_panel(&mut self, ctx: &Context) {
        let mut import_requested = false;
        let mut select_requested: Option<String> = None;
        let mut remove_requested: Option<String> = None;

        egui::SidePanel::left("repositories")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Repositories");
                ui.add_space(4.0);

                ui.label("Repository URL");
                ui.text_edit_singleline(&mut self.model.import_url);
                ui.label("Branch (optional)");
                ui.text_edit_singleline(&mut self.model.import_branch);

                let can_import = !self.model.import_url.trim().is_empty()
                    && self.pending_scan.is_none()
                    && self.backend.is_some();
                if ui
                    .add_enabled(can_import, egui::Button::new("Import"))
                    .clicked()
                {
                    import_requested = true;
                }

                ui.separator();

                let entries = self
                    .store
                    .entries()
                    .iter()
                    .map(|entry| {
                        (
                            entry.id.clone(),
                            entry.repo_name.clone(),
                            entry.repo_url.clone(),
                            self.store.active_id() == Some(entry.id.as_str()),
                        )
                    })
                    .collect::<Vec<_>>();

                if entries.is_empty() {
                    ui.label("No repositories yet. Import one to replace the demo graph.");
                }

                egui::ScrollArea::vertical()
                    .id_salt("repo_list_scroll")
                    .max_height(260.0)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for (id, name, url, is_active) in &entries {
                            ui.horizontal(|ui| {
                                if ui.selectable_label(*is_active, name).clicked() {
                                    select_requested = Some(id.clone());
                                }
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    if ui.small_button("✕").clicked() {
                                        remove_requested = Some(id.clone());
                                    }
                                });
                            });
                            ui.small(url.as_str());
                            ui.add_space(2.0);
                        }
                    });

                ui.separator();
                ui.label("Find node");
                ui.text_edit_singleline(&mut self.model.search);

                ui.separator();
                ui.label(RichText::new("Legend").strong());
                for category in NodeCategory::ALL {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                        ui.painter()
                            .rect_filled(swatch, 2.0, category_color(category));
                        ui.label(category.label());
                    });
                }
            });

        if import_requested {
            let repo_url = self.model.import_url.trim().to_owned();
            let branch = match self.model.import_branch.trim() {
                "" => None,
                branch => Some(branch.to_owned()),
            };
            self.model.import_url.clear();
            self.model.import_branch.clear();
            self.start_scan(repo_url, branch, super::ScanOrigin::NewImport);
        }
        if let Some(id) = select_requested {
            self.select_repo(&id);
        }
        if let Some(id) = remove_requested {
            self.remove_repo(&id);
        }
    }

    pub(super) fn show_details_panel(&mut self, ctx: &Context) {
        let mut select_requested: Option<String> = None;

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Node Details");
                ui.add_space(6.0);

                let Some(selected_id) = self.model.selected.clone() else {
                    ui.label("Select a node from the graph.");
                    return;
                };
                let Some(node) = self
                    .model
                    .data
                    .nodes
                    .iter()
                    .find(|node| node.id == selected_id)
                else {
                    ui.label("Selected node is no longer visible.");
                    return;
                };

                ui.label(RichText::new(&node.label).strong());
                ui.small(node.path.as_str());
                ui.add_space(6.0);

                ui.label(format!("Category: {}", node.category.label()));
                if let Some(layer) = &node.layer {
                    ui.label(format!("Layer: {layer}"));
                }
                ui.label(format!("Dependencies: {}", node.connections.len()));

                ui.separator();
                ui.label(RichText::new("Quality").strong());
                match &node.metrics {
                    Some(metrics) => {
                        match metrics.gate_passed() {
                            Some(true) => {
                                ui.colored_label(Color32::from_rgb(63, 185, 80), "Gate: passed")
                            }
                            Some(false) => {
                                ui.colored_label(Color32::from_rgb(248, 81, 73), "Gate: failed")
                            }
                            None => ui.label("Gate: not reported"),
                        };
                        if let Some(bugs) = metrics.bugs {
                            ui.label(format!("Bugs: {bugs}"));
                        }
                        if let Some(smells) = metrics.code_smells {
                            ui.label(format!("Code smells: {smells}"));
                        }
                        if let Some(vulnerabilities) = metrics.vulnerabilities {
                            ui.label(format!("Vulnerabilities: {vulnerabilities}"));
                        }
                        if let Some(hotspots) = metrics.security_hotspots {
                            ui.label(format!("Security hotspots: {hotspots}"));
                        }
                        if let Some(coverage) = metrics.coverage {
                            ui.label(format!("Coverage: {coverage:.1}%"));
                        }
                        if let Some(duplications) = metrics.duplications {
                            ui.label(format!("Duplication: {duplications:.1}%"));
                        }
                    }
                    None => {
                        ui.label("No analysis data for this node.");
                    }
                }

                ui.separator();
                ui.label(RichText::new("Dependencies").strong());
                if node.connections.is_empty() {
                    ui.label("None within the visible graph.");
                } else {
                    let connections = node.connections.clone();
                    egui::ScrollArea::vertical()
                        .id_salt("connection_scroll")
                        .max_height(280.0)
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for target in &connections {
                                let label = self
                                    .model
                                    .data
                                    .nodes
                                    .iter()
                                    .find(|other| &other.id == target)
                                    .map(|other| other.label.clone())
                                    .unwrap_or_else(|| target.clone());
                                if ui.link(label).on_hover_text(target.as_str()).clicked() {
                                    select_requested = Some(target.clone());
                                }
                            }
                        });
                }
            });

        if let Some(id) = select_requested {
            self.model.selected = Some(id);
        }
    }
}
