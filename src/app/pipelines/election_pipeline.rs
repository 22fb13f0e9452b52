use crate::adapters::read_json;
use crate::app::pipelines::write_json;
use crate::core::election::{self, ResultsMerger};
use crate::core::{DataSource, Pipeline, Storage};
use crate::domain::model::{DistrictFeature, DistrictResult, FeatureCollection, ResultRecord};
use crate::utils::error::Result;
use serde_json::{Map, Value};

pub const HOUSE_OUTPUT: &str = "house.json";
pub const SENATE_OUTPUT: &str = "senate.json";

/// House inputs with district identifiers already normalized.
#[derive(Debug, Clone)]
pub struct HouseInputs {
    pub features: Vec<DistrictFeature>,
    pub collection: Map<String, Value>,
    pub results: Vec<DistrictResult>,
}

pub struct HousePipeline<D: DataSource, S: Storage> {
    data: D,
    storage: S,
    boundaries_file: String,
    results_file: String,
}

impl<D: DataSource, S: Storage> HousePipeline<D, S> {
    pub fn new(
        data: D,
        storage: S,
        boundaries_file: impl Into<String>,
        results_file: impl Into<String>,
    ) -> Self {
        Self {
            data,
            storage,
            boundaries_file: boundaries_file.into(),
            results_file: results_file.into(),
        }
    }
}

#[async_trait::async_trait]
impl<D: DataSource, S: Storage> Pipeline for HousePipeline<D, S> {
    type Raw = HouseInputs;
    type Output = FeatureCollection;

    fn name(&self) -> &str {
        "house"
    }

    async fn extract(&self) -> Result<HouseInputs> {
        // 兩份資料同時抓取，任一失敗則整個 view 失敗
        let (districts, records) = tokio::try_join!(
            read_json::<FeatureCollection, _>(&self.data, &self.boundaries_file),
            read_json::<Vec<ResultRecord>, _>(&self.data, &self.results_file),
        )
        .inspect_err(|e| tracing::error!("❌ House fetch failed: {}", e))?;

        let features: Vec<DistrictFeature> = districts
            .features
            .into_iter()
            .map(DistrictFeature::from)
            .collect();
        let unidentified = features.iter().filter(|f| f.district.is_none()).count();
        if unidentified > 0 {
            tracing::warn!(
                "⚠️ {} of {} district features carry no usable GEOID",
                unidentified,
                features.len()
            );
        }

        let results = election::normalize_results(&records);
        tracing::info!(
            "Loaded {} district features and {} result rows",
            features.len(),
            results.len()
        );

        Ok(HouseInputs {
            features,
            collection: districts.extra,
            results,
        })
    }

    async fn transform(&self, raw: HouseInputs) -> Result<FeatureCollection> {
        let merger = ResultsMerger::new(&raw.results);
        tracing::debug!("Winners resolved for {} districts", merger.district_count());

        let mut features = merger.merge(&raw.features);
        election::apply_style(&mut features, election::house_style);

        Ok(FeatureCollection {
            features,
            extra: raw.collection,
        })
    }

    async fn load(&self, output: FeatureCollection) -> Result<String> {
        write_json(&self.storage, HOUSE_OUTPUT, &output).await
    }
}

/// Senate geometry arrives pre-merged; only styling is applied.
pub struct SenatePipeline<D: DataSource, S: Storage> {
    data: D,
    storage: S,
    senate_file: String,
}

impl<D: DataSource, S: Storage> SenatePipeline<D, S> {
    pub fn new(data: D, storage: S, senate_file: impl Into<String>) -> Self {
        Self {
            data,
            storage,
            senate_file: senate_file.into(),
        }
    }
}

#[async_trait::async_trait]
impl<D: DataSource, S: Storage> Pipeline for SenatePipeline<D, S> {
    type Raw = FeatureCollection;
    type Output = FeatureCollection;

    fn name(&self) -> &str {
        "senate"
    }

    async fn extract(&self) -> Result<FeatureCollection> {
        read_json(&self.data, &self.senate_file)
            .await
            .inspect_err(|e| tracing::error!("❌ Senate fetch failed: {}", e))
    }

    async fn transform(&self, mut raw: FeatureCollection) -> Result<FeatureCollection> {
        election::apply_style(&mut raw.features, election::senate_style);
        Ok(raw)
    }

    async fn load(&self, output: FeatureCollection) -> Result<String> {
        write_json(&self.storage, SENATE_OUTPUT, &output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipelines::test_support::MockStorage;
    use crate::core::etl::EtlEngine;
    use crate::utils::error::DashboardError;
    use serde_json::json;

    async fn seed_house(data: &MockStorage) {
        data.put_json(
            "congress.geojson",
            json!({
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "geometry": null, "properties": {"GEOID": "0601"}},
                    {"type": "Feature", "geometry": null, "properties": {"GEOID20": "4801"}},
                    {"type": "Feature", "geometry": null, "properties": {"NAME": "Unknown"}}
                ]
            }),
        )
        .await;
        data.put_json(
            "election_results.json",
            json!([
                {"GeoID": "0601", "Party": "R", "%": 40.0},
                {"GeoID": "0601", "Party": "D", "%": 55.0},
                {"GeoID": "4801", "Party": "R", "%": 62.5}
            ]),
        )
        .await;
    }

    #[tokio::test]
    async fn test_house_pipeline_end_to_end() {
        let data = MockStorage::new();
        seed_house(&data).await;
        let out = MockStorage::new();

        let pipeline = HousePipeline::new(
            data,
            out.clone(),
            "congress.geojson",
            "election_results.json",
        );
        let path = EtlEngine::new(pipeline).run().await.unwrap();
        assert_eq!(path, "test_output/house.json");

        let written = out.get_json(HOUSE_OUTPUT).await.unwrap();
        assert_eq!(written["type"], json!("FeatureCollection"));

        let features = written["features"].as_array().unwrap();
        assert_eq!(features[0]["properties"]["winnerParty"], json!("D"));
        assert_eq!(features[0]["properties"]["winnerPct"], json!(55.0));
        assert_eq!(features[0]["properties"]["style"]["fillColor"], json!("#3B82F6"));
        assert_eq!(features[1]["properties"]["winnerParty"], json!("R"));
        assert_eq!(features[2]["properties"]["winnerParty"], Value::Null);
        assert_eq!(features[2]["properties"]["winnerPct"], json!(0.0));
        assert_eq!(features[2]["properties"]["style"]["fillOpacity"], json!(0.0));
    }

    #[tokio::test]
    async fn test_house_pipeline_missing_results_fails() {
        let data = MockStorage::new();
        data.put_json("congress.geojson", json!({"type": "FeatureCollection", "features": []}))
            .await;

        let pipeline = HousePipeline::new(
            data,
            MockStorage::new(),
            "congress.geojson",
            "election_results.json",
        );
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, DashboardError::IoError(_)));
    }

    #[tokio::test]
    async fn test_house_pipeline_malformed_results() {
        let data = MockStorage::new();
        data.put_json("congress.geojson", json!({"type": "FeatureCollection", "features": []}))
            .await;
        data.put_json("election_results.json", json!({"not": "a list"})).await;

        let pipeline = HousePipeline::new(
            data,
            MockStorage::new(),
            "congress.geojson",
            "election_results.json",
        );
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_senate_pipeline_styles_features() {
        let data = MockStorage::new();
        data.put_json(
            "senate.geojson",
            json!({
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "geometry": null,
                     "properties": {"state": "OHIO", "party_simplified": "REPUBLICAN", "vote_pct": 50.0}}
                ]
            }),
        )
        .await;
        let out = MockStorage::new();

        let pipeline = SenatePipeline::new(data, out.clone(), "senate.geojson");
        EtlEngine::new(pipeline).run().await.unwrap();

        let written = out.get_json(SENATE_OUTPUT).await.unwrap();
        let props = &written["features"][0]["properties"];
        assert_eq!(props["state"], json!("OHIO"));
        assert_eq!(props["style"]["fillColor"], json!("#EF4444"));
        assert_eq!(props["style"]["fillOpacity"], json!(0.5));
    }
}
