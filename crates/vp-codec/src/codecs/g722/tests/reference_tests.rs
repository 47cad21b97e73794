//! Reference tests for ITU-T G.722 compliance validation

#[cfg(test)]
mod tests {
    use crate::codecs::g722::codec::G722Codec;
    use crate::types::{AudioCodec, CodecConfig, CodecType, SampleRate};

    fn create_test_codec() -> G722Codec {
        let config = CodecConfig::new(CodecType::G722)
            .with_sample_rate(SampleRate::Rate16000)
            .with_channels(1)
            .with_frame_size_ms(20.0);
        
        G722Codec::new(config).unwrap()
    }

    #[test]
    fn test_known_test_vectors() {
        // TODO: Implement test vectors from ITU-T G.722 specification
        // This would involve:
        // 1. Loading reference input samples
        // 2. Running through our codec
        // 3. Comparing with expected output
        // 4. Ensuring bit-exact compliance
        
        let mut codec = create_test_codec();
        
        // Placeholder test - replace with actual test vectors
        let samples = vec![0i16; 320];
        let encoded = codec.encode(&samples).unwrap();
        let decoded = codec.decode(&encoded).unwrap();
        
        assert_eq!(decoded.len(), 320);
    }

    #[test]
    fn test_qmf_filter_response() {
        // TODO: Test QMF filter frequency response against reference
        // This would involve:
        // 1. Generating sinusoidal inputs at different frequencies
        // 2. Measuring the response in low/high bands
        // 3. Comparing with expected QMF characteristics
        
        // Placeholder for now
        assert!(true);
    }

    #[test]
    fn test_adpcm_quantization_tables() {
        // TODO: Test ADPCM quantization/inverse quantization tables
        // This would involve:
        // 1. Testing all quantization levels
        // 2. Ensuring proper reconstruction
        // 3. Comparing with ITU-T reference tables
        
        // Placeholder for now
        assert!(true);
    }

    #[test]
    fn test_bit_exact_compliance() {
        // TODO: Test bit-exact compliance with ITU-T reference
        // This would involve:
        // 1. Using exact same test vectors as reference
        // 2. Ensuring identical bit patterns in output
        // 3. Testing edge cases and boundary conditions
        
        // Placeholder for now
        assert!(true);
    }

    // TODO: Add more reference tests:
    // - Different G.722 modes (1, 2, 3)
    // - Various input patterns
    // - Boundary conditions
    // - Error recovery scenarios
} 