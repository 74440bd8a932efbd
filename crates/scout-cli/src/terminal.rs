//! Stdout implementation of the presentation boundary.
//!
//! Mirrors the output-channel layout of the editor extension this tool grew
//! out of: package header, flags, links, install commands, then the longer
//! sections.

use crate::install::PackageManager;
use scout_core::Frontend;
use scout_core::types::{
    ManifestInfo, PackageFlags, PackageInfo, SearchPage, SearchResult, Suggestion, UpdatePlan,
    VersionHistory,
};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

pub struct TerminalFrontend;

impl TerminalFrontend {
    fn flag_markers(flags: Option<&PackageFlags>) -> String {
        let Some(flags) = flags else {
            return String::new();
        };
        let mut markers = String::new();
        if flags.deprecated.is_some() {
            markers.push_str(" [deprecated]");
        }
        if flags.unstable {
            markers.push_str(" [unstable]");
        }
        if flags.insecure {
            markers.push_str(" [insecure]");
        }
        markers
    }

    fn print_result_line(index: usize, result: &SearchResult) {
        println!(
            "{:>3}. {}@{}{}",
            index + 1,
            result.name,
            result.version,
            Self::flag_markers(result.flags.as_ref())
        );
        println!("     score: {:.2}", result.score.final_score);
        if !result.description.is_empty() {
            println!("     {}", result.description);
        }
    }

    fn print_install_commands(name: &str) {
        println!("\nInstall:");
        for manager in PackageManager::ALL {
            println!(
                "  {:<5} {}",
                manager.label(),
                manager.install_command(name, false)
            );
        }
    }
}

impl Frontend for TerminalFrontend {
    fn render_search_results(&self, page: &SearchPage) {
        println!(
            "{} packages found (showing {})\n",
            page.total,
            page.results.len()
        );
        for (index, result) in page.results.iter().enumerate() {
            Self::print_result_line(index, result);
        }
    }

    fn render_suggestions(&self, suggestions: &[Suggestion]) {
        for suggestion in suggestions {
            let label = suggestion
                .highlight
                .as_deref()
                .unwrap_or(&suggestion.result.name);
            println!(
                "{} v{}{}",
                label,
                suggestion.result.version,
                Self::flag_markers(suggestion.result.flags.as_ref())
            );
            if !suggestion.result.description.is_empty() {
                println!("  {}", suggestion.result.description);
            }
        }
    }

    fn render_package_info(&self, info: &PackageInfo) {
        println!("Package: {}", info.name);
        println!("Version: {}", info.version);
        if let Some(description) = &info.description {
            println!("Description: {description}");
        }
        if !info.published_at.is_empty() {
            println!("Published: {}", info.published_at);
        }
        if let Some(license) = &info.license {
            println!("License: {license}");
        }

        println!("\nLinks:");
        println!("  registry:   {}", info.links.registry);
        if let Some(homepage) = &info.links.homepage {
            println!("  homepage:   {homepage}");
        }
        if let Some(repository) = &info.links.repository {
            println!("  repository: {repository}");
        }
        if let Some(bugs) = &info.links.bugs {
            println!("  issues:     {bugs}");
        }

        Self::print_install_commands(&info.name);

        if !info.keywords.is_empty() {
            println!("\nKeywords: {}", info.keywords.join(", "));
        }
        if let Some(author) = &info.author {
            println!("\nAuthor: {}", author.display_name());
            if let Some(email) = &author.email {
                println!("  {email}");
            }
        }
        if !info.maintainers.is_empty() {
            println!("\nMaintainers:");
            for maintainer in &info.maintainers {
                match &maintainer.email {
                    Some(email) => println!("  - {} ({email})", maintainer.display_name()),
                    None => println!("  - {}", maintainer.display_name()),
                }
            }
        }

        for (title, deps) in [
            ("Dependencies", &info.dependencies),
            ("Dev Dependencies", &info.dev_dependencies),
            ("Peer Dependencies", &info.peer_dependencies),
        ] {
            if !deps.is_empty() {
                println!("\n{title}:");
                for (name, range) in deps {
                    println!("  - {name}: {range}");
                }
            }
        }
    }

    fn render_version_history(&self, history: &VersionHistory) {
        println!("Package: {}", history.name);
        println!("Total versions: {}", history.total_versions);
        println!("Showing: {} most recent\n", history.versions.len());

        for entry in &history.versions {
            println!("- {}", entry.version);
            if !entry.published_at.is_empty() {
                println!("    published: {}", entry.published_at);
            }
            if let Some(license) = &entry.license {
                println!("    license: {license}");
            }
            if !entry.dependencies.is_empty() {
                println!("    dependencies: {}", entry.dependencies.len());
            }
            if !entry.dev_dependencies.is_empty() {
                println!("    dev dependencies: {}", entry.dev_dependencies.len());
            }
        }
    }

    fn render_manifest_info(&self, info: &ManifestInfo) {
        let all = info.all();
        if all.is_empty() {
            println!("No dependencies found in package.json");
            return;
        }
        println!("Total dependencies: {}\n", all.len());

        for (title, deps) in [
            ("Dependencies", &info.dependencies),
            ("Dev Dependencies", &info.dev_dependencies),
            ("Peer Dependencies", &info.peer_dependencies),
            ("Optional Dependencies", &info.optional_dependencies),
        ] {
            if deps.is_empty() {
                continue;
            }
            println!("{title} ({}):", deps.len());
            for dep in deps {
                println!("  - {}: {}", dep.name, dep.range);
            }
            println!();
        }
    }

    fn render_update_plan(&self, plan: &UpdatePlan) {
        if plan.changed == 0 {
            println!("All dependencies are up to date.");
            return;
        }
        println!("{} dependencies can be updated:\n", plan.changed);
        for change in &plan.changes {
            println!(
                "  {} ({}): {} -> {}",
                change.name,
                change.kind.label(),
                change.from_range,
                change.to_range
            );
        }
    }

    fn render_batch_info(&self, infos: &BTreeMap<String, PackageInfo>) {
        for (name, info) in infos {
            let description = info.description.as_deref().unwrap_or("");
            println!("{name}: {} {description}", info.version);
        }
    }

    fn render_search_by_name(&self, results: &BTreeMap<String, Vec<SearchResult>>) {
        for (name, matches) in results {
            println!("{name}:");
            if matches.is_empty() {
                println!("  no results found");
            } else {
                for (index, result) in matches.iter().enumerate() {
                    println!(
                        "  {}. {}@{} (score {:.2})",
                        index + 1,
                        result.name,
                        result.version,
                        result.score.final_score
                    );
                }
            }
            println!();
        }
    }

    fn choose(&self, prompt: &str, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        println!("{prompt}");
        for (index, option) in options.iter().enumerate() {
            println!("  {}) {option}", index + 1);
        }
        print!("> ");
        std::io::stdout().flush().ok()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let picked: usize = line.trim().parse().ok()?;
        (1..=options.len()).contains(&picked).then(|| picked - 1)
    }
}
