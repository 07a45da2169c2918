//! sad - Statistical analysis of small hand-entered datasets
//!
//! This library provides the data grid, clipboard-style block paste, the
//! Shapiro-Wilk normality gate that decides between parametric and
//! non-parametric analyses, the analyses themselves (one-way ANOVA and simple
//! OLS regression) and report export with embedded charts.

pub mod analysis;
pub mod charts;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod describe;
pub mod normality;
pub mod report;
pub mod table;
